//! Reporting periods: calendar month, quarter, or year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Quarter containing a 1-based month.
    pub fn of_month(month: u32) -> Option<Self> {
        match month {
            1..=3 => Some(Quarter::Q1),
            4..=6 => Some(Quarter::Q2),
            7..=9 => Some(Quarter::Q3),
            10..=12 => Some(Quarter::Q4),
            _ => None,
        }
    }

    /// Accepts "Q1".."Q4" in any case, or a bare "1".."4".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.strip_prefix('Q').unwrap_or(s.as_str()) {
            "1" => Some(Quarter::Q1),
            "2" => Some(Quarter::Q2),
            "3" => Some(Quarter::Q3),
            "4" => Some(Quarter::Q4),
            _ => None,
        }
    }

    pub fn first_month(&self) -> u32 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 4,
            Quarter::Q3 => 7,
            Quarter::Q4 => 10,
        }
    }

    pub fn months(&self) -> [u32; 3] {
        let m = self.first_month();
        [m, m + 1, m + 2]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    /// "Quarter 1 (Jan-Mar)"
    pub fn name(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Quarter 1 (Jan-Mar)",
            Quarter::Q2 => "Quarter 2 (Apr-Jun)",
            Quarter::Q3 => "Quarter 3 (Jul-Sep)",
            Quarter::Q4 => "Quarter 4 (Oct-Dec)",
        }
    }

    /// "Jan-Mar"
    pub fn month_span(&self) -> String {
        let [first, _, last] = self.months();
        format!("{}-{}", month_abbr(first), month_abbr(last))
    }
}

/// Three-letter English month abbreviation for a 1-based month.
pub fn month_abbr(month: u32) -> &'static str {
    MONTH_ABBR
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("???")
}

/// Normalize "1", "01", "jan", "Jan", "January" to a 1-based month number.
pub fn normalize_month(s: &str) -> Option<u32> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    MONTH_NAMES
        .iter()
        .position(|name| *name == s || name[..3] == s)
        .map(|i| i as u32 + 1)
}

/// A reporting period selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: Quarter },
    Year { year: i32 },
}

impl Period {
    pub fn month(year: i32, month: u32) -> Self {
        Period::Month { year, month }
    }

    pub fn quarter(year: i32, quarter: Quarter) -> Self {
        Period::Quarter { year, quarter }
    }

    pub fn year(year: i32) -> Self {
        Period::Year { year }
    }

    pub fn year_value(&self) -> i32 {
        match self {
            Period::Month { year, .. } | Period::Quarter { year, .. } | Period::Year { year } => *year,
        }
    }

    /// Membership predicate; boundaries are inclusive calendar days.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date.year() != self.year_value() {
            return false;
        }
        match self {
            Period::Month { month, .. } => date.month() == *month,
            Period::Quarter { quarter, .. } => Quarter::of_month(date.month()) == Some(*quarter),
            Period::Year { .. } => true,
        }
    }

    /// Human-readable label: "Mar 2025", "Q1 2025", "2025".
    pub fn label(&self) -> String {
        match self {
            Period::Month { year, month } => format!("{} {}", month_abbr(*month), year),
            Period::Quarter { year, quarter } => format!("{} {}", quarter.label(), year),
            Period::Year { year } => year.to_string(),
        }
    }

    /// Longer label used on report headers.
    pub fn reporting_label(&self) -> String {
        match self {
            Period::Year { year } => format!("{year} (January - December {year})"),
            Period::Quarter { year, quarter } => {
                format!("{} {} ({})", quarter.label(), year, quarter.month_span())
            }
            Period::Month { .. } => self.label(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
