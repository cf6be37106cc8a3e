//! Period report aggregator: groups resolved invoice lines by return code
//! for a month, quarter or year and derives collected/deductible/payable VAT.
//!
//! One aggregator serves all three period kinds; the only difference between
//! them is the membership predicate and, for years, a per-quarter breakdown.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};
use vatbook_core::{CompanyInfo, Invoice, Period, Quarter, VatBox, round2};

use crate::apportion::{ResolvedLine, resolve_lines};
use crate::selection::{Coverage, select};

pub const REPORT_TYPE: &str = "vat_tax_return";

/// One transaction as it appears under its category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportLine {
    pub date: NaiveDate,
    pub invoice_no: String,
    pub description: String,
    pub net_amount: Decimal,
    pub vat_percentage: Decimal,
    pub vat_amount: Decimal,
    pub vat_category: VatBox,
    pub vat_category_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Totals {
    pub net: Decimal,
    pub vat: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryBucket {
    pub name: &'static str,
    pub transactions: Vec<ReportLine>,
    pub totals: Totals,
}

impl CategoryBucket {
    fn empty(code: VatBox) -> Self {
        Self {
            name: code.display_name(),
            transactions: Vec::new(),
            totals: Totals::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyHeader {
    pub company_name: String,
    pub company_vat: String,
    pub reporting_period: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VatCalculation {
    pub vat_collected: Decimal,
    pub vat_deductible: Decimal,
    pub vat_payable: Decimal,
}

impl VatCalculation {
    fn new(collected: Decimal, deductible: Decimal) -> Self {
        Self {
            vat_collected: round2(collected),
            vat_deductible: round2(deductible),
            vat_payable: round2(collected - deductible),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuarterSummary {
    pub period: String,
    pub vat_collected: Decimal,
    pub vat_deductible: Decimal,
    pub vat_payable: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VatReport {
    pub report_type: &'static str,
    pub period: String,
    pub company_info: CompanyHeader,
    pub categories: BTreeMap<VatBox, CategoryBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarterly_breakdown: Option<BTreeMap<Quarter, QuarterSummary>>,
    pub vat_calculation: VatCalculation,
    pub coverage: Coverage,
}

impl VatReport {
    pub fn category(&self, code: VatBox) -> Option<&CategoryBucket> {
        self.categories.get(&code)
    }
}

#[derive(Default)]
struct Running {
    collected: Decimal,
    deductible: Decimal,
}

impl Running {
    fn add(&mut self, invoice: &Invoice, vat: Decimal) {
        if invoice.is_sale() {
            self.collected += vat;
        } else {
            self.deductible += vat;
        }
    }
}

/// Build the report for `period` over `invoices`. Never fails: invoices with
/// unparsable dates and lines with unknown codes are left out and counted
/// in [`Coverage`].
pub fn aggregate(invoices: &[Invoice], period: &Period, company: &CompanyInfo) -> VatReport {
    let mut coverage = Coverage::default();
    let selected = select(invoices, period, &mut coverage);

    let mut categories: BTreeMap<VatBox, CategoryBucket> =
        VatBox::ALL.into_iter().map(|b| (b, CategoryBucket::empty(b))).collect();
    let mut overall = Running::default();
    let mut by_quarter: BTreeMap<Quarter, Running> = BTreeMap::new();

    for (invoice, date) in selected {
        for line in resolve_lines(invoice) {
            let Some(code) = VatBox::from_code(&line.transaction.category_code) else {
                debug!(
                    invoice = %invoice.invoice_number,
                    code = %line.transaction.category_code,
                    "dropping line with unknown category code"
                );
                coverage.uncategorized_lines += 1;
                continue;
            };

            overall.add(invoice, line.vat_amount);
            if let Some(q) = Quarter::of_month(date.month()) {
                by_quarter.entry(q).or_default().add(invoice, line.vat_amount);
            }

            let bucket = categories.entry(code).or_insert_with(|| CategoryBucket::empty(code));
            bucket.totals.net += line.net_amount;
            bucket.totals.vat += line.vat_amount;
            bucket.transactions.push(report_line(invoice, date, code, line));
        }
    }

    for bucket in categories.values_mut() {
        bucket.totals.net = round2(bucket.totals.net);
        bucket.totals.vat = round2(bucket.totals.vat);
    }

    let quarterly_breakdown = match period {
        Period::Year { year } => Some(quarterly_breakdown(*year, &by_quarter)),
        _ => None,
    };

    let vat_calculation = VatCalculation::new(overall.collected, overall.deductible);
    info!(
        period = %period,
        invoices = coverage.invoices_in_period,
        skipped = coverage.invoices_skipped,
        uncategorized = coverage.uncategorized_lines,
        payable = %vat_calculation.vat_payable,
        "built vat report"
    );

    VatReport {
        report_type: REPORT_TYPE,
        period: period.label(),
        company_info: CompanyHeader {
            company_name: company.display_name().to_string(),
            company_vat: company.display_vat_number().to_string(),
            reporting_period: period.reporting_label(),
        },
        categories,
        quarterly_breakdown,
        vat_calculation,
        coverage,
    }
}

fn report_line(invoice: &Invoice, date: NaiveDate, code: VatBox, line: ResolvedLine) -> ReportLine {
    let counterparty = (!invoice.counterparty_name.is_empty()).then(|| invoice.counterparty_name.clone());
    let (customer_name, vendor_name) = if invoice.is_sale() {
        (counterparty, None)
    } else {
        (None, counterparty)
    };
    ReportLine {
        date,
        invoice_no: invoice.invoice_number.clone(),
        description: line.transaction.description,
        net_amount: round2(line.net_amount),
        vat_percentage: line.transaction.tax_percent,
        vat_amount: round2(line.vat_amount),
        vat_category: code,
        vat_category_description: line.transaction.category_description,
        customer_name,
        vendor_name,
    }
}

fn quarterly_breakdown(year: i32, by_quarter: &BTreeMap<Quarter, Running>) -> BTreeMap<Quarter, QuarterSummary> {
    Quarter::ALL
        .into_iter()
        .map(|q| {
            let (collected, deductible) = by_quarter
                .get(&q)
                .map(|r| (r.collected, r.deductible))
                .unwrap_or_default();
            let calc = VatCalculation::new(collected, deductible);
            let summary = QuarterSummary {
                period: Period::quarter(year, q).reporting_label(),
                vat_collected: calc.vat_collected,
                vat_deductible: calc.vat_deductible,
                vat_payable: calc.vat_payable,
            };
            (q, summary)
        })
        .collect()
}
