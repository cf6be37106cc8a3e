//! The canonical return codes ("boxes") of the Dutch VAT return and the
//! sections they are printed under.
//!
//! Variant order is the table order: `Ord`, iteration and every report use it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VatBox {
    #[serde(rename = "1a")]
    Box1a,
    #[serde(rename = "1b")]
    Box1b,
    #[serde(rename = "1c")]
    Box1c,
    #[serde(rename = "1d")]
    Box1d,
    #[serde(rename = "1e")]
    Box1e,
    #[serde(rename = "2a")]
    Box2a,
    #[serde(rename = "3a")]
    Box3a,
    #[serde(rename = "3b")]
    Box3b,
    #[serde(rename = "3c")]
    Box3c,
    #[serde(rename = "4a")]
    Box4a,
    #[serde(rename = "4b")]
    Box4b,
    #[serde(rename = "4c")]
    Box4c,
    #[serde(rename = "5a")]
    Box5a,
    #[serde(rename = "5b")]
    Box5b,
}

/// Sections of the return form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    DomesticSupplies,
    DomesticReverseCharge,
    CrossBorderSupplies,
    CrossBorderPurchases,
    Totals,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::DomesticSupplies,
        Section::DomesticReverseCharge,
        Section::CrossBorderSupplies,
        Section::CrossBorderPurchases,
        Section::Totals,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::DomesticSupplies => "1",
            Section::DomesticReverseCharge => "2",
            Section::CrossBorderSupplies => "3",
            Section::CrossBorderPurchases => "4",
            Section::Totals => "5",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::DomesticSupplies => "Domestic Performance",
            Section::DomesticReverseCharge => "Domestic Reverse Charge Schemes",
            Section::CrossBorderSupplies => "Performance to or in Foreign Countries",
            Section::CrossBorderPurchases => "Performance from Abroad to You",
            Section::Totals => "Totals",
        }
    }
}

impl VatBox {
    pub const ALL: [VatBox; 14] = [
        VatBox::Box1a,
        VatBox::Box1b,
        VatBox::Box1c,
        VatBox::Box1d,
        VatBox::Box1e,
        VatBox::Box2a,
        VatBox::Box3a,
        VatBox::Box3b,
        VatBox::Box3c,
        VatBox::Box4a,
        VatBox::Box4b,
        VatBox::Box4c,
        VatBox::Box5a,
        VatBox::Box5b,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            VatBox::Box1a => "1a",
            VatBox::Box1b => "1b",
            VatBox::Box1c => "1c",
            VatBox::Box1d => "1d",
            VatBox::Box1e => "1e",
            VatBox::Box2a => "2a",
            VatBox::Box3a => "3a",
            VatBox::Box3b => "3b",
            VatBox::Box3c => "3c",
            VatBox::Box4a => "4a",
            VatBox::Box4b => "4b",
            VatBox::Box4c => "4c",
            VatBox::Box5a => "5a",
            VatBox::Box5b => "5b",
        }
    }

    /// Exact lookup by code. Surrounding whitespace and case are ignored;
    /// free-text labels return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        VatBox::ALL.into_iter().find(|b| b.code() == code)
    }

    /// Category name used by the period reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            VatBox::Box1a => "Sales Taxed at the Standard Rate (21%)",
            VatBox::Box1b => "Sales Taxed at the Reduced Rate (9%)",
            VatBox::Box1c => "Sales Taxed at 0% (EU and Export)",
            VatBox::Box1d => "Private use",
            VatBox::Box1e => "Exempt / out-of-scope supplies",
            VatBox::Box2a => "Reverse-Charge Supplies",
            VatBox::Box3a => "Supplies of Goods to EU Countries",
            VatBox::Box3b => "Supplies of Services to EU Countries",
            VatBox::Box3c => "Intra-EU B2C goods (distance/installation sales)",
            VatBox::Box4a => "Purchases of Goods from EU Countries",
            VatBox::Box4b => "Purchases of Services from EU Countries",
            VatBox::Box4c => "Purchases of Goods from Non-EU Countries (Imports)",
            VatBox::Box5a => "Domestic purchases with Dutch VAT",
            VatBox::Box5b => "Input VAT on Domestic Purchases",
        }
    }

    /// Row description on the declaration form.
    pub fn return_label(&self) -> &'static str {
        match self {
            VatBox::Box1a => "Supplies/services taxed at standard rate (High)",
            VatBox::Box1b => "Supplies/services taxed at reduced rate (Low)",
            VatBox::Box1c => "Supplies/services taxed at other rates, except 0%",
            VatBox::Box1d => "Private use",
            VatBox::Box1e => "Supplies/services taxed at 0% or not taxed",
            VatBox::Box2a => "Supplies/services where VAT liability is shifted to you",
            VatBox::Box3a => "Supplies to countries outside the EU (Exports)",
            VatBox::Box3b => "Supplies to/in countries within the EU",
            VatBox::Box3c => "Installation/distance sales within the EU",
            VatBox::Box4a | VatBox::Box4c => "Supplies/services from countries outside the EU",
            VatBox::Box4b => "Supplies/services from countries within the EU",
            VatBox::Box5a => "Domestic purchases with Dutch VAT",
            VatBox::Box5b => "Input Tax (Deductible VAT)",
        }
    }

    pub fn section(&self) -> Section {
        match self {
            VatBox::Box1a | VatBox::Box1b | VatBox::Box1c | VatBox::Box1d | VatBox::Box1e => {
                Section::DomesticSupplies
            }
            VatBox::Box2a => Section::DomesticReverseCharge,
            VatBox::Box3a | VatBox::Box3b | VatBox::Box3c => Section::CrossBorderSupplies,
            VatBox::Box4a | VatBox::Box4b | VatBox::Box4c => Section::CrossBorderPurchases,
            VatBox::Box5a | VatBox::Box5b => Section::Totals,
        }
    }

    /// Whether the declaration has a row for this box. Imports do not; the
    /// declaration codes such lines again from direction, rate and country.
    pub fn has_declaration_row(&self) -> bool {
        *self != VatBox::Box4c
    }

    /// VAT in this box counts towards turnover tax (row 5a).
    pub fn is_turnover_tax(&self) -> bool {
        matches!(
            self.section(),
            Section::DomesticSupplies | Section::DomesticReverseCharge | Section::CrossBorderSupplies
        )
    }

    /// VAT in this box counts towards input tax (row 5b).
    pub fn is_input_tax(&self) -> bool {
        self.section() == Section::Totals
    }
}

impl std::fmt::Display for VatBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_roundtrips_table() {
        for b in VatBox::ALL {
            assert_eq!(VatBox::from_code(b.code()), Some(b));
        }
        assert_eq!(VatBox::from_code(" 1A "), Some(VatBox::Box1a));
        assert_eq!(VatBox::from_code("Reverse Charge"), None);
        assert_eq!(VatBox::from_code(""), None);
    }

    #[test]
    fn test_table_order_follows_sections() {
        let sections: Vec<Section> = VatBox::ALL.iter().map(|b| b.section()).collect();
        let mut sorted = sections.clone();
        sorted.sort();
        assert_eq!(sections, sorted, "boxes must be grouped by section in table order");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&VatBox::Box3b).unwrap();
        assert_eq!(json, "\"3b\"");
        let back: VatBox = serde_json::from_str("\"4c\"").unwrap();
        assert_eq!(back, VatBox::Box4c);
    }

    #[test]
    fn test_tax_groups() {
        assert!(VatBox::Box2a.is_turnover_tax());
        assert!(VatBox::Box3c.is_turnover_tax());
        assert!(!VatBox::Box4a.is_turnover_tax());
        assert!(VatBox::Box5a.is_input_tax());
        assert!(!VatBox::Box1a.is_input_tax());
        assert!(VatBox::Box4a.has_declaration_row());
        assert!(!VatBox::Box4c.has_declaration_row());
    }
}
