//! Date utilities: lenient invoice-date parsing.
//!
//! Invoice dates arrive in whatever form the extraction step produced. We accept
//! day-month-year with `-`, `/` or `.` separators (2- or 4-digit years), ISO
//! dates, and long forms like "8 January 2024" or "Jan 8, 2024".

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<d>\d{1,2})(?P<s1>[-/.])(?P<m>\d{1,2})(?P<s2>[-/.])(?P<y>\d{4}|\d{2})$")
        .expect("day-month-year pattern")
});

static ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})$").expect("iso date pattern")
});

const LONG_FORMATS: [&str; 2] = ["%d %B %Y", "%B %d, %Y"];

/// Two-digit years follow the POSIX `%y` pivot: 69-99 → 19xx, 00-68 → 20xx.
fn expand_year(y: &str) -> Option<i32> {
    let n: i32 = y.parse().ok()?;
    Some(match y.len() {
        2 if n >= 69 => 1900 + n,
        2 => 2000 + n,
        _ => n,
    })
}

/// Parse an invoice date, returning `None` when no known format matches.
pub fn parse_invoice_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = DAY_MONTH_YEAR.captures(s) {
        // "31-03/2025" is not a date
        if caps["s1"] != caps["s2"] {
            return None;
        }
        let d: u32 = caps["d"].parse().ok()?;
        let m: u32 = caps["m"].parse().ok()?;
        let y = expand_year(&caps["y"])?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }

    if let Some(caps) = ISO.captures(s) {
        let y: i32 = caps["y"].parse().ok()?;
        let m: u32 = caps["m"].parse().ok()?;
        let d: u32 = caps["d"].parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }

    // chrono's %B also accepts abbreviated month names
    LONG_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Render a parsable date as "8 January 2024"; anything else is returned as-is.
pub fn format_date_human(s: &str) -> String {
    match parse_invoice_date(s) {
        Some(d) => format!("{} {}", d.day(), d.format("%B %Y")),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_month_year_separators() {
        assert_eq!(parse_invoice_date("31-03-2025"), Some(ymd(2025, 3, 31)));
        assert_eq!(parse_invoice_date("31/03/2025"), Some(ymd(2025, 3, 31)));
        assert_eq!(parse_invoice_date("31.03.2025"), Some(ymd(2025, 3, 31)));
        assert_eq!(parse_invoice_date("1.3.2025"), Some(ymd(2025, 3, 1)));
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(parse_invoice_date("31-03-25"), Some(ymd(2025, 3, 31)));
        assert_eq!(parse_invoice_date("01/01/99"), Some(ymd(1999, 1, 1)));
        assert_eq!(parse_invoice_date("01.01.68"), Some(ymd(2068, 1, 1)));
    }

    #[test]
    fn test_iso_and_long_forms() {
        assert_eq!(parse_invoice_date("2025-07-28"), Some(ymd(2025, 7, 28)));
        assert_eq!(parse_invoice_date("8 January 2024"), Some(ymd(2024, 1, 8)));
        assert_eq!(parse_invoice_date("8 Jan 2024"), Some(ymd(2024, 1, 8)));
        assert_eq!(parse_invoice_date("Jan 8, 2024"), Some(ymd(2024, 1, 8)));
        assert_eq!(parse_invoice_date("January 8, 2024"), Some(ymd(2024, 1, 8)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_invoice_date(""), None);
        assert_eq!(parse_invoice_date("not a date"), None);
        assert_eq!(parse_invoice_date("31-02-2025"), None);
        assert_eq!(parse_invoice_date("31-03/2025"), None);
        assert_eq!(parse_invoice_date("2025/13/01"), None);
    }

    #[test]
    fn test_format_date_human() {
        assert_eq!(format_date_human("2024-01-08"), "8 January 2024");
        assert_eq!(format_date_human("someday"), "someday");
    }
}
