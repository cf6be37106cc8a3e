//! Counterparty country zones relative to the domestic jurisdiction.

use serde::{Deserialize, Serialize};

pub const DOMESTIC_COUNTRY: &str = "NL";

/// EU member states other than the domestic country. GB is non-EU.
pub const EU_COUNTRIES: [&str; 26] = [
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT", "LV",
    "LT", "LU", "MT", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CountryZone {
    Domestic,
    Eu,
    NonEu,
    Unknown,
}

impl CountryZone {
    pub fn of(country: &str) -> Self {
        let c = country.trim().to_uppercase();
        if c.is_empty() {
            CountryZone::Unknown
        } else if c == DOMESTIC_COUNTRY {
            CountryZone::Domestic
        } else if EU_COUNTRIES.contains(&c.as_str()) {
            CountryZone::Eu
        } else {
            CountryZone::NonEu
        }
    }
}
