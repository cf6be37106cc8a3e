//! Deterministic rules mapping a free-text VAT category label, direction, rate
//! and counterparty country to a return box.
//!
//! Rules are evaluated top to bottom and the first match wins. Label keywords
//! take priority over rate inference; country only disambiguates zero-rate
//! branches.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;
use vatbook_core::{CountryZone, Direction, VatBox, parse_percent};

/// Label predicate: the lowercased label contains any of `any` and none of
/// `none`. An empty `any` matches every label.
#[derive(Debug, Clone, Copy)]
pub struct LabelMatch {
    pub any: &'static [&'static str],
    pub none: &'static [&'static str],
}

impl LabelMatch {
    const ANYTHING: LabelMatch = LabelMatch { any: &[], none: &[] };

    const fn any(any: &'static [&'static str]) -> Self {
        LabelMatch { any, none: &[] }
    }

    fn matches(&self, label: &str) -> bool {
        (self.any.is_empty() || self.any.iter().any(|k| label.contains(k)))
            && !self.none.iter().any(|k| label.contains(k))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateMatch {
    Any,
    Exactly(u32),
    NonZero,
}

impl RateMatch {
    fn matches(&self, rate: Decimal) -> bool {
        match self {
            RateMatch::Any => true,
            RateMatch::Exactly(n) => rate == Decimal::from(*n),
            RateMatch::NonZero => !rate.is_zero(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub label: LabelMatch,
    /// `None` matches either direction
    pub direction: Option<Direction>,
    pub rate: RateMatch,
    /// Empty matches any zone
    pub zones: &'static [CountryZone],
    pub target: VatBox,
}

impl Rule {
    fn matches(&self, label: &str, direction: Option<Direction>, rate: Decimal, zone: CountryZone) -> bool {
        self.label.matches(label)
            && (self.direction.is_none() || self.direction == direction)
            && self.rate.matches(rate)
            && (self.zones.is_empty() || self.zones.contains(&zone))
    }
}

use CountryZone::{Domestic, Eu, NonEu, Unknown};
use Direction::{Purchase, Sale};
use RateMatch::{Any, Exactly, NonZero};

const STANDARD: LabelMatch = LabelMatch::any(&["standard"]);
const REDUCED: LabelMatch = LabelMatch::any(&["reduced"]);
const ZERO_RATED: LabelMatch = LabelMatch::any(&["zero rated", "zero-rated"]);
const EU_GOODS: LabelMatch = LabelMatch::any(&["eu goods"]);
const EU_SERVICES: LabelMatch = LabelMatch::any(&["eu services"]);
const EU_ONLY: LabelMatch = LabelMatch { any: &["eu"], none: &["goods", "services"] };
const REVERSE_CHARGE: LabelMatch = LabelMatch::any(&["reverse charge", "reverse-charge"]);
const IMPORT: LabelMatch = LabelMatch::any(&["import"]);

const fn rule(
    name: &'static str,
    label: LabelMatch,
    direction: Option<Direction>,
    rate: RateMatch,
    zones: &'static [CountryZone],
    target: VatBox,
) -> Rule {
    Rule { name, label, direction, rate, zones, target }
}

/// The ordered rule table.
///
/// Zero-rated purchases with no country default to 4a, while the rate-only
/// fallback for the same case defaults to 2a. Both are kept as observed.
pub static RULES: &[Rule] = &[
    // Standard rate: sales resolved by rate (9% is a mislabeled reduced sale)
    rule("standard-sale-21", STANDARD, Some(Sale), Exactly(21), &[], VatBox::Box1a),
    rule("standard-sale-9", STANDARD, Some(Sale), Exactly(9), &[], VatBox::Box1b),
    rule("standard-sale", STANDARD, Some(Sale), Any, &[], VatBox::Box1a),
    rule("standard-purchase", STANDARD, Some(Purchase), Any, &[], VatBox::Box5b),
    // Reduced rate
    rule("reduced-sale", REDUCED, Some(Sale), Any, &[], VatBox::Box1b),
    rule("reduced-purchase", REDUCED, Some(Purchase), Any, &[], VatBox::Box5b),
    // Zero rated: country decides
    rule("zero-sale-domestic", ZERO_RATED, Some(Sale), Exactly(0), &[Domestic], VatBox::Box1e),
    rule("zero-sale-eu", ZERO_RATED, Some(Sale), Exactly(0), &[Eu], VatBox::Box3b),
    rule("zero-sale-non-eu", ZERO_RATED, Some(Sale), Exactly(0), &[NonEu], VatBox::Box3a),
    rule("zero-sale-unknown", ZERO_RATED, Some(Sale), Exactly(0), &[Unknown], VatBox::Box1c),
    rule("zero-sale-inconsistent-rate", ZERO_RATED, Some(Sale), NonZero, &[], VatBox::Box1c),
    rule("zero-purchase-eu", ZERO_RATED, Some(Purchase), Exactly(0), &[Eu], VatBox::Box4b),
    rule("zero-purchase-non-eu", ZERO_RATED, Some(Purchase), Exactly(0), &[Domestic, NonEu], VatBox::Box4a),
    rule("zero-purchase-unknown", ZERO_RATED, Some(Purchase), Exactly(0), &[Unknown], VatBox::Box4a),
    rule("zero-purchase-inconsistent-rate", ZERO_RATED, Some(Purchase), NonZero, &[], VatBox::Box4a),
    // EU supplies / acquisitions
    rule("eu-goods-sale", EU_GOODS, Some(Sale), Any, &[], VatBox::Box3a),
    rule("eu-goods-purchase", EU_GOODS, Some(Purchase), Any, &[], VatBox::Box4a),
    rule("eu-services-sale", EU_SERVICES, Some(Sale), Any, &[], VatBox::Box3b),
    rule("eu-services-purchase", EU_SERVICES, Some(Purchase), Any, &[], VatBox::Box4b),
    rule("eu-sale", EU_ONLY, Some(Sale), Any, &[], VatBox::Box3a),
    rule("eu-purchase", EU_ONLY, Some(Purchase), Any, &[], VatBox::Box4a),
    // Other labels
    rule("reverse-charge-purchase", REVERSE_CHARGE, Some(Purchase), Any, &[], VatBox::Box2a),
    rule("import-purchase", IMPORT, Some(Purchase), Any, &[], VatBox::Box4c),
    // Label not recognized: infer from rate and country
    rule("fallback-sale-21", LabelMatch::ANYTHING, Some(Sale), Exactly(21), &[], VatBox::Box1a),
    rule("fallback-sale-9", LabelMatch::ANYTHING, Some(Sale), Exactly(9), &[], VatBox::Box1b),
    rule("fallback-sale-0-domestic", LabelMatch::ANYTHING, Some(Sale), Exactly(0), &[Domestic], VatBox::Box1e),
    rule("fallback-sale-0-eu", LabelMatch::ANYTHING, Some(Sale), Exactly(0), &[Eu], VatBox::Box3b),
    rule("fallback-sale-0-non-eu", LabelMatch::ANYTHING, Some(Sale), Exactly(0), &[NonEu], VatBox::Box3a),
    rule("fallback-sale-0-unknown", LabelMatch::ANYTHING, Some(Sale), Exactly(0), &[Unknown], VatBox::Box1c),
    rule("fallback-sale", LabelMatch::ANYTHING, Some(Sale), Any, &[], VatBox::Box1a),
    rule("fallback-purchase-0-eu", LabelMatch::ANYTHING, Some(Purchase), Exactly(0), &[Eu], VatBox::Box4b),
    rule("fallback-purchase-0-non-eu", LabelMatch::ANYTHING, Some(Purchase), Exactly(0), &[Domestic, NonEu], VatBox::Box4a),
    rule("fallback-purchase-0-unknown", LabelMatch::ANYTHING, Some(Purchase), Exactly(0), &[Unknown], VatBox::Box2a),
    rule("fallback-purchase", LabelMatch::ANYTHING, Some(Purchase), Any, &[], VatBox::Box5b),
];

/// Code returned when no rule matches (only reachable without a direction).
pub const FINAL_FALLBACK: VatBox = VatBox::Box5b;

/// Result of classification, with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub code: VatBox,
    pub rule: &'static str,
}

/// Classify with the matching rule name.
pub fn explain(label: &str, direction: Option<Direction>, tax_percent: Decimal, country: &str) -> Classification {
    let label = label.trim().to_lowercase();
    let zone = CountryZone::of(country);

    let found = RULES
        .iter()
        .find(|r| r.matches(&label, direction, tax_percent, zone))
        .map(|r| Classification { code: r.target, rule: r.name })
        .unwrap_or(Classification { code: FINAL_FALLBACK, rule: "final-fallback" });

    trace!(label = %label, ?direction, %tax_percent, ?zone, rule = found.rule, code = %found.code, "classified");
    found
}

/// Classify already-parsed inputs. Never fails.
pub fn classify_parsed(label: &str, direction: Option<Direction>, tax_percent: Decimal, country: &str) -> VatBox {
    explain(label, direction, tax_percent, country).code
}

/// Classify raw text inputs: `direction` is "sale(s)"/"purchase(s)" in any
/// case, `tax_percent` may carry a trailing `%` and reads as 0 when unparsable.
pub fn classify(label: &str, direction: &str, tax_percent: &str, country: &str) -> VatBox {
    classify_parsed(label, Direction::parse(direction), parse_percent(tax_percent), country)
}
