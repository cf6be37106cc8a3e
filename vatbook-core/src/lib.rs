//! vatbook-core: invoice records, the VAT return category table, periods, and
//! the lenient parsing helpers shared by the engine and the ingest layer.

pub mod amount;
pub mod category;
pub mod country;
pub mod invoice;
pub mod period;
pub mod time;

pub use amount::{parse_amount, parse_percent, round2};
pub use category::{Section, VatBox};
pub use country::{CountryZone, DOMESTIC_COUNTRY, EU_COUNTRIES};
pub use invoice::{CompanyInfo, Direction, Invoice, Transaction};
pub use period::{Period, Quarter, month_abbr, normalize_month};
pub use time::{format_date_human, parse_invoice_date};
