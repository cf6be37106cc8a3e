//! Single-amount VAT arithmetic: compute VAT for a net amount and check an
//! extracted VAT figure against it.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use vatbook_core::{VatBox, round2};

/// Largest difference between extracted and computed VAT still accepted.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VatAmount {
    pub vat_amount: Decimal,
    pub total_with_vat: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VatCheck {
    pub calculated: Decimal,
    pub difference: Decimal,
    pub is_valid: bool,
}

/// VAT on `pre_vat` at `percent`. A result outside the decimal range reads
/// as zero VAT.
pub fn calculate_vat(pre_vat: Decimal, percent: Decimal) -> VatAmount {
    let vat_amount = match pre_vat
        .checked_mul(percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
    {
        Some(vat) => round2(vat),
        None => {
            debug!(%pre_vat, %percent, "vat out of range, using zero");
            Decimal::ZERO
        }
    };
    VatAmount {
        vat_amount,
        total_with_vat: round2(pre_vat.saturating_add(vat_amount)),
    }
}

pub fn validate_vat(extracted: Decimal, pre_vat: Decimal, percent: Decimal) -> VatCheck {
    let calculated = calculate_vat(pre_vat, percent).vat_amount;
    let difference = extracted.saturating_sub(calculated).abs();
    VatCheck {
        calculated,
        difference: round2(difference),
        is_valid: difference <= TOLERANCE,
    }
}

/// Rate normally charged for lines reported in `code`.
pub fn default_rate(code: VatBox) -> Decimal {
    match code {
        VatBox::Box1b => Decimal::from(9),
        VatBox::Box1c
        | VatBox::Box2a
        | VatBox::Box3a
        | VatBox::Box3b
        | VatBox::Box4a
        | VatBox::Box4b => Decimal::ZERO,
        _ => Decimal::from(21),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_calculate_vat() {
        let v = calculate_vat(dec!(100), dec!(21));
        assert_eq!(v.vat_amount, dec!(21.00));
        assert_eq!(v.total_with_vat, dec!(121.00));

        let credit = calculate_vat(dec!(-100), dec!(9));
        assert_eq!(credit.vat_amount, dec!(-9.00));
        assert_eq!(credit.total_with_vat, dec!(-109.00));
    }

    #[test]
    fn test_validate_within_tolerance() {
        assert_eq!(TOLERANCE, dec!(0.01));
        let ok = validate_vat(dec!(21.01), dec!(100), dec!(21));
        assert!(ok.is_valid);
        assert_eq!(ok.difference, dec!(0.01));

        let bad = validate_vat(dec!(20.50), dec!(100), dec!(21));
        assert!(!bad.is_valid);
        assert_eq!(bad.difference, dec!(0.50));
        assert_eq!(bad.calculated, dec!(21.00));
    }

    #[test]
    fn test_default_rates() {
        assert_eq!(default_rate(VatBox::Box1a), dec!(21));
        assert_eq!(default_rate(VatBox::Box1b), dec!(9));
        assert_eq!(default_rate(VatBox::Box3b), dec!(0));
        assert_eq!(default_rate(VatBox::Box5b), dec!(21));
        assert_eq!(default_rate(VatBox::Box3c), dec!(21));
    }

    #[test]
    fn test_out_of_range_rate_is_zero_vat() {
        let v = calculate_vat(dec!(100), Decimal::from_scientific("1e27").unwrap());
        assert_eq!(v.vat_amount, Decimal::ZERO);
        assert_eq!(v.total_with_vat, dec!(100.00));

        let check = validate_vat(Decimal::MIN, Decimal::MAX, dec!(21));
        assert_eq!(check.calculated, Decimal::ZERO);
        assert!(!check.is_valid);
    }
}
