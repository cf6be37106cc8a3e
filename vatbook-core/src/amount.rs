//! Lenient parsing and rounding of money amounts and percentages.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round half away from zero to cents, always carrying two decimal places,
/// so credit notes round symmetrically with regular invoices.
pub fn round2(d: Decimal) -> Decimal {
    let mut r = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    r.rescale(2);
    r
}

/// Parse an amount such as `"€ 1,234.50"`, `"-440"` or `"1.5e3"`.
/// Empty, `nan` and unparsable input all read as zero.
pub fn parse_amount(s: &str) -> Decimal {
    let clean: String = s
        .chars()
        .filter(|c| *c != '€' && *c != ',' && !c.is_whitespace())
        .collect();
    if clean.is_empty() || clean.eq_ignore_ascii_case("nan") {
        return Decimal::ZERO;
    }
    Decimal::from_str(&clean)
        .or_else(|_| Decimal::from_scientific(&clean))
        .unwrap_or(Decimal::ZERO)
}

/// Parse a rate such as `"21"`, `"21%"` or `"9.0 %"`; unparsable input is zero.
pub fn parse_percent(s: &str) -> Decimal {
    parse_amount(s.trim().trim_end_matches('%'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("€ 1,234.50"), dec!(1234.50));
        assert_eq!(parse_amount("-440"), dec!(-440));
        assert_eq!(parse_amount("1.5e3"), dec!(1500));
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("NaN"), Decimal::ZERO);
        assert_eq!(parse_amount("twelve"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("21%"), dec!(21));
        assert_eq!(parse_percent(" 9.0 % "), dec!(9));
        assert_eq!(parse_percent("0"), Decimal::ZERO);
        assert_eq!(parse_percent("standard"), Decimal::ZERO);
    }

    #[test]
    fn test_round2_is_symmetric() {
        assert_eq!(round2(dec!(2.345)), dec!(2.35));
        assert_eq!(round2(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round2(dec!(21)).to_string(), "21.00");
        assert_eq!(round2(dec!(10.004)).to_string(), "10.00");
    }
}
