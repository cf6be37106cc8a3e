//! Resolve each invoice line to an effective net amount and VAT amount.
//!
//! Invoice-level totals are authoritative for VAT: when an invoice carries a
//! VAT total it is split over the lines in proportion to their net amounts.
//! Signs are preserved, so credit notes reduce both net and VAT.

use rust_decimal::Decimal;
use tracing::debug;
use vatbook_core::{Invoice, Transaction, round2};

/// A line with its amounts resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub transaction: Transaction,
    pub net_amount: Decimal,
    pub vat_amount: Decimal,
}

/// Resolve every line of `invoice`. An invoice without transactions resolves
/// to exactly one line built from its totals.
pub fn resolve_lines(invoice: &Invoice) -> Vec<ResolvedLine> {
    let items = invoice.line_items();
    let invoice_net = invoice.effective_net();
    let invoice_vat = invoice.effective_tax();
    let single = items.len() == 1;
    let count = Decimal::from(items.len());

    let mut base = items
        .iter()
        .fold(Decimal::ZERO, |sum, t| sum.saturating_add(t.amount_before_tax));
    if base.is_zero() && !invoice_net.is_zero() && single {
        base = invoice_net;
    }

    let mut lines = Vec::with_capacity(items.len());
    for txn in items {
        let net_amount = if !txn.amount_before_tax.is_zero() {
            txn.amount_before_tax
        } else if invoice_net.is_zero() {
            Decimal::ZERO
        } else {
            // from here on the invoice net is the apportionment base
            if base.is_zero() {
                base = invoice_net;
            }
            if single { invoice_net } else { invoice_net / count }
        };

        let vat_amount = resolve_vat(&invoice.invoice_number, net_amount, base, invoice_vat, txn.tax_percent);
        lines.push(ResolvedLine { transaction: txn, net_amount, vat_amount });
    }
    lines
}

/// VAT for one line, in priority order: apportion the invoice VAT total,
/// take the invoice VAT whole when there is no base, apply the line rate.
/// A product or quotient outside the decimal range yields zero.
fn resolve_vat(
    invoice_number: &str,
    net_amount: Decimal,
    base: Decimal,
    invoice_vat: Decimal,
    tax_percent: Decimal,
) -> Decimal {
    let vat = if !invoice_vat.is_zero() && !base.is_zero() {
        net_amount
            .checked_div(base)
            .and_then(|share| share.checked_mul(invoice_vat))
    } else if !invoice_vat.is_zero() && !net_amount.is_zero() {
        Some(invoice_vat)
    } else if !tax_percent.is_zero() {
        net_amount
            .checked_mul(tax_percent)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
    } else {
        Some(Decimal::ZERO)
    };

    match vat {
        Some(vat) => round2(vat),
        None => {
            debug!(invoice = invoice_number, %net_amount, %tax_percent, "tax amount out of range, using zero");
            Decimal::ZERO
        }
    }
}
