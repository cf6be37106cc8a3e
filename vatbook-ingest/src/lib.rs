//! vatbook-ingest: register exports (JSON/CSV) to engine invoices, and the per-year invoice book.

pub mod book;
pub mod convert;
pub mod parsers;
pub mod types;

pub use book::{IngestOutcome, InvoiceBook, booking_year};
pub use convert::{derive_country, to_invoice};
pub use parsers::load_register_file;
pub use types::{RegisterEntry, SourceRecord};
