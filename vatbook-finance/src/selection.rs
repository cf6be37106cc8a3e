//! Period selection shared by the report and the declaration.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use vatbook_core::{Invoice, Period, parse_invoice_date};

/// How much of the input made it into a report.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Coverage {
    pub total_invoices: usize,
    pub invoices_in_period: usize,
    /// Invoices whose date could not be parsed
    pub invoices_skipped: usize,
    /// Lines whose category code is not in the category table
    pub uncategorized_lines: usize,
}

/// Invoices dated inside `period`, paired with their parsed date, in input order.
pub(crate) fn select<'a>(
    invoices: &'a [Invoice],
    period: &Period,
    coverage: &mut Coverage,
) -> Vec<(&'a Invoice, NaiveDate)> {
    coverage.total_invoices = invoices.len();
    let mut selected = Vec::new();
    for invoice in invoices {
        let Some(date) = parse_invoice_date(&invoice.date) else {
            debug!(invoice = %invoice.invoice_number, date = %invoice.date, "skipping invoice with unparsable date");
            coverage.invoices_skipped += 1;
            continue;
        };
        if period.contains(date) {
            selected.push((invoice, date));
        }
    }
    coverage.invoices_in_period = selected.len();
    selected
}
