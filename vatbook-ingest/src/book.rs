//! The invoice book: ingested invoices bucketed by calendar year.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vatbook_core::{Invoice, parse_invoice_date};

use crate::convert::{fallback_invoice_number, to_invoice};
use crate::types::{RegisterEntry, SourceRecord};

/// Bucket key written for invoices whose date could not be parsed.
const UNKNOWN_YEAR: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredBook", from = "StoredBook")]
pub struct InvoiceBook {
    years: BTreeMap<Option<i32>, Vec<Invoice>>,
}

/// On-disk shape: year keys as strings.
#[derive(Serialize, Deserialize)]
struct StoredBook {
    years: BTreeMap<String, Vec<Invoice>>,
}

impl From<InvoiceBook> for StoredBook {
    fn from(book: InvoiceBook) -> Self {
        let years = book
            .years
            .into_iter()
            .map(|(y, invoices)| (y.map_or_else(|| UNKNOWN_YEAR.to_string(), |y| y.to_string()), invoices))
            .collect();
        StoredBook { years }
    }
}

impl From<StoredBook> for InvoiceBook {
    fn from(stored: StoredBook) -> Self {
        let mut book = InvoiceBook::default();
        for (key, invoices) in stored.years {
            book.years.entry(key.parse().ok()).or_default().extend(invoices);
        }
        book
    }
}

/// Counters returned from one ingest call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    /// `null` stands for the bucket of undated invoices
    pub updated_years: BTreeSet<Option<i32>>,
}

impl IngestOutcome {
    pub fn message(&self) -> String {
        format!(
            "Processed {} invoices, skipped {}, errors: {}",
            self.processed, self.skipped, self.errors
        )
    }
}

/// Year an invoice is booked under.
pub fn booking_year(invoice: &Invoice) -> Option<i32> {
    parse_invoice_date(&invoice.date).map(|d| d.year())
}

impl InvoiceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoices booked under `year`; `None` selects the undated bucket.
    pub fn invoices(&self, year: Option<i32>) -> &[Invoice] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn years(&self) -> impl Iterator<Item = Option<i32>> + '_ {
        self.years.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.years.clear();
    }

    /// Add one invoice without duplicate checks. Returns its year bucket.
    pub fn insert(&mut self, invoice: Invoice) -> Option<i32> {
        let year = booking_year(&invoice);
        self.years.entry(year).or_default().push(invoice);
        year
    }

    /// An entry is a duplicate when its file was already booked, or when it
    /// carries its own invoice number (not just the file stem) and that
    /// number was already booked.
    pub fn is_duplicate(&self, entry: &RegisterEntry) -> bool {
        let file_name = entry.file_name.as_deref().filter(|f| !f.is_empty());
        let number = entry
            .invoice_number
            .as_deref()
            .filter(|n| !n.is_empty() && Some(n.to_string()) != fallback_invoice_number(entry));

        self.years.values().flatten().any(|inv| {
            file_name.is_some_and(|f| inv.source_file == f)
                || number.is_some_and(|n| inv.invoice_number == n)
        })
    }

    /// Book parsed records. Rejected and unconvertible records count as
    /// errors; a bad record never aborts the batch.
    pub fn ingest(&mut self, records: impl IntoIterator<Item = SourceRecord>) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        for record in records {
            let entry = match record {
                SourceRecord::Entry(entry) => entry,
                SourceRecord::Rejected { file_name, reason } => {
                    warn!(file = file_name.as_deref().unwrap_or("-"), %reason, "rejected register item");
                    outcome.errors += 1;
                    continue;
                }
            };

            if self.is_duplicate(&entry) {
                outcome.skipped += 1;
                continue;
            }

            match to_invoice(&entry) {
                Ok(invoice) => {
                    outcome.updated_years.insert(self.insert(invoice));
                    outcome.processed += 1;
                }
                Err(e) => {
                    warn!(file = entry.file_name.as_deref().unwrap_or("-"), error = %e, "could not convert register entry");
                    outcome.errors += 1;
                }
            }
        }
        info!(
            processed = outcome.processed,
            skipped = outcome.skipped,
            errors = outcome.errors,
            "ingested register records"
        );
        outcome
    }
}
