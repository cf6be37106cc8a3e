//! The Dutch VAT return: five sections of rows, one per return code, with
//! the section-5 settlement computed from the others.
//!
//! Unlike the period report, lines without a recognised code are not dropped
//! here; a code is derived from direction, rate and country instead. The same
//! goes for codes the form has no row for (imports, 4c).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};
use vatbook_core::{CompanyInfo, CountryZone, Direction, Invoice, Period, Section, VatBox, round2};

use crate::apportion::resolve_lines;
use crate::selection::{Coverage, select};

pub const REPORT_TYPE: &str = "VAT_Return";
pub const JURISDICTION: &str = "NL";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportMeta {
    pub report_type: &'static str,
    pub jurisdiction: &'static str,
    pub company_name: String,
    pub vat_number: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeclarationRow {
    pub code: &'static str,
    pub description: &'static str,
    /// `None` on the section-5 settlement rows
    pub net_amount: Option<Decimal>,
    pub vat: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeclarationSection {
    pub id: &'static str,
    pub title: &'static str,
    pub rows: Vec<DeclarationRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Declaration {
    pub report_meta: ReportMeta,
    pub sections: Vec<DeclarationSection>,
    pub coverage: Coverage,
}

impl Declaration {
    pub fn row(&self, code: &str) -> Option<&DeclarationRow> {
        self.sections.iter().flat_map(|s| &s.rows).find(|r| r.code == code)
    }

    /// Amount to pay (positive) or reclaim (negative).
    pub fn total(&self) -> Decimal {
        self.row("Total").map(|r| r.vat).unwrap_or_default()
    }
}

/// Code for a line whose own code is missing or has no row on the return.
///
/// On the purchase side the domestic country counts as EU, so a domestic
/// purchase only reaches 5a/5b when the counterparty country is unknown.
pub fn derive_code(
    direction: Direction,
    tax_percent: Decimal,
    label: &str,
    country: &str,
    vat_amount: Decimal,
) -> VatBox {
    let zone = CountryZone::of(country);
    match direction {
        Direction::Sale => {
            if tax_percent == Decimal::from(21) {
                VatBox::Box1a
            } else if tax_percent == Decimal::from(9) {
                VatBox::Box1b
            } else if tax_percent.is_zero() {
                match zone {
                    CountryZone::Eu => VatBox::Box3b,
                    CountryZone::NonEu => VatBox::Box3a,
                    CountryZone::Domestic | CountryZone::Unknown => VatBox::Box1e,
                }
            } else {
                VatBox::Box1c
            }
        }
        Direction::Purchase => {
            let label = label.to_lowercase();
            if label.contains("reverse") {
                VatBox::Box2a
            } else if label.contains("eu") || matches!(zone, CountryZone::Eu | CountryZone::Domestic) {
                VatBox::Box4b
            } else if label.contains("import") || zone == CountryZone::NonEu {
                VatBox::Box4a
            } else if vat_amount > Decimal::ZERO {
                VatBox::Box5a
            } else {
                VatBox::Box5b
            }
        }
    }
}

/// Build the return for `period` over `invoices`.
pub fn declare(invoices: &[Invoice], period: &Period, company: &CompanyInfo) -> Declaration {
    let mut coverage = Coverage::default();
    let selected = select(invoices, period, &mut coverage);

    let mut rows: BTreeMap<VatBox, (Decimal, Decimal)> = BTreeMap::new();
    for (invoice, _) in selected {
        for line in resolve_lines(invoice) {
            let txn = &line.transaction;
            let code = match VatBox::from_code(&txn.category_code).filter(VatBox::has_declaration_row) {
                Some(code) => code,
                None => {
                    let derived = derive_code(
                        invoice.direction,
                        txn.tax_percent,
                        &txn.category_code,
                        &invoice.counterparty_country,
                        line.vat_amount,
                    );
                    debug!(
                        invoice = %invoice.invoice_number,
                        label = %txn.category_code,
                        code = %derived,
                        "derived return code"
                    );
                    coverage.uncategorized_lines += 1;
                    derived
                }
            };
            let entry = rows.entry(code).or_default();
            entry.0 += line.net_amount;
            entry.1 += line.vat_amount;
        }
    }

    let vat_of = |b: VatBox| rows.get(&b).map(|r| r.1).unwrap_or_default();
    let turnover: Decimal = VatBox::ALL.into_iter().filter(|b| b.is_turnover_tax()).map(vat_of).sum();
    let input: Decimal = VatBox::ALL.into_iter().filter(|b| b.is_input_tax()).map(vat_of).sum();
    let settlement = turnover - input;

    let mut sections: Vec<DeclarationSection> = Section::ALL
        .into_iter()
        .filter(|s| *s != Section::Totals)
        .map(|section| DeclarationSection {
            id: section.id(),
            title: section.title(),
            rows: VatBox::ALL
                .into_iter()
                .filter(|b| b.section() == section && b.has_declaration_row())
                .map(|b| {
                    let (net, vat) = rows.get(&b).copied().unwrap_or_default();
                    DeclarationRow {
                        code: b.code(),
                        description: b.return_label(),
                        net_amount: Some(round2(net)),
                        vat: round2(vat),
                    }
                })
                .collect(),
        })
        .collect();
    sections.push(settlement_section(turnover, input, settlement));

    info!(
        period = %period,
        invoices = coverage.invoices_in_period,
        derived = coverage.uncategorized_lines,
        total = %round2(settlement),
        "built vat return"
    );

    Declaration {
        report_meta: ReportMeta {
            report_type: REPORT_TYPE,
            jurisdiction: JURISDICTION,
            company_name: company.display_name().to_string(),
            vat_number: company.display_vat_number().to_string(),
            period: period.label(),
        },
        sections,
        coverage,
    }
}

fn settlement_section(turnover: Decimal, input: Decimal, settlement: Decimal) -> DeclarationSection {
    let row = |code, description, vat| DeclarationRow {
        code,
        description,
        net_amount: None,
        vat: round2(vat),
    };
    DeclarationSection {
        id: Section::Totals.id(),
        title: Section::Totals.title(),
        rows: vec![
            row("5a", "Turnover Tax (Subtotal sections 1 to 4)", turnover),
            row("5b", "Input Tax (Deductible VAT)", input),
            row("5c", "Subtotal (5a minus 5b)", settlement),
            row("5d", "Reduction according to small business scheme (KOR)", Decimal::ZERO),
            row("5e", "Estimate previous return", Decimal::ZERO),
            row("5f", "Estimate", Decimal::ZERO),
            row("Total", "Total to Pay / Reclaim", settlement),
        ],
    }
}
