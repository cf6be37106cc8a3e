//! Year-level VAT position from invoice tax totals alone.

use rust_decimal::Decimal;
use serde::Serialize;
use vatbook_core::{Invoice, round2};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayableStatus {
    RefundDue,
    PaymentDue,
    Balanced,
}

impl PayableStatus {
    pub fn of(payable: Decimal) -> Self {
        if payable < Decimal::ZERO {
            PayableStatus::RefundDue
        } else if payable > Decimal::ZERO {
            PayableStatus::PaymentDue
        } else {
            PayableStatus::Balanced
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PayableSummary {
    pub year: i32,
    pub vat_collected: Decimal,
    pub vat_paid: Decimal,
    pub vat_payable: Decimal,
    pub status: PayableStatus,
}

impl PayableSummary {
    /// Sums invoice-level VAT totals; line items and dates are not consulted,
    /// the caller passes the invoices booked under `year`.
    pub fn from_invoices(year: i32, invoices: &[Invoice]) -> Self {
        let (collected, paid) = invoices.iter().fold((Decimal::ZERO, Decimal::ZERO), |(c, p), inv| {
            if inv.is_sale() {
                (c + inv.effective_tax(), p)
            } else {
                (c, p + inv.effective_tax())
            }
        });
        let vat_payable = round2(collected - paid);
        Self {
            year,
            vat_collected: round2(collected),
            vat_paid: round2(paid),
            vat_payable,
            status: PayableStatus::of(vat_payable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use vatbook_core::Direction;

    fn inv(dir: Direction, tax: Decimal) -> Invoice {
        Invoice::new("X", "2025-01-01", dir).with_totals(None, Some(tax), None)
    }

    #[test]
    fn test_payment_due() {
        let s = PayableSummary::from_invoices(
            2025,
            &[inv(Direction::Sale, dec!(210)), inv(Direction::Purchase, dec!(42))],
        );
        assert_eq!(s.vat_payable, dec!(168.00));
        assert_eq!(s.status, PayableStatus::PaymentDue);
    }

    #[test]
    fn test_refund_and_balanced() {
        let refund = PayableSummary::from_invoices(2025, &[inv(Direction::Purchase, dec!(42))]);
        assert_eq!(refund.status, PayableStatus::RefundDue);
        assert_eq!(refund.vat_payable, dec!(-42.00));

        let empty = PayableSummary::from_invoices(2025, &[]);
        assert_eq!(empty.status, PayableStatus::Balanced);
        assert_eq!(serde_json::to_value(empty.status).unwrap(), "balanced");
    }

    #[test]
    fn test_credit_note_lowers_collected() {
        let s = PayableSummary::from_invoices(
            2025,
            &[inv(Direction::Sale, dec!(210)), inv(Direction::Sale, dec!(-21))],
        );
        assert_eq!(s.vat_collected, dec!(189.00));
    }
}
