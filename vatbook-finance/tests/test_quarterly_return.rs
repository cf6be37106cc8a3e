use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vatbook_core::{CompanyInfo, Direction, Invoice, Period, Quarter, Transaction, VatBox};
use vatbook_finance::{aggregate, classify, declare};

/// Book a single-line invoice the way ingest does: classify the raw label first.
fn booked(
    num: &str,
    date: &str,
    direction: &str,
    label: &str,
    country: &str,
    amount: Decimal,
    pct: Decimal,
) -> Invoice {
    let code = classify(label, direction, &pct.to_string(), country);
    let dir = Direction::parse(direction).unwrap();
    Invoice::new(num, date, dir)
        .with_counterparty(format!("{num} counterparty"), country)
        .with_transaction(Transaction::new(label, amount, pct, code.code()).with_category_description(label))
}

fn q1_book() -> Vec<Invoice> {
    vec![
        booked("S-001", "02-01-2025", "sale", "Standard VAT", "NL", dec!(2000), dec!(21)),
        booked("S-002", "14-02-2025", "sale", "Zero Rated", "DE", dec!(1500), dec!(0)),
        booked("S-003", "31-03-2025", "sale", "Reduced Rate", "NL", dec!(400), dec!(9)),
        booked("CN-001", "20-03-2025", "sale", "Standard VAT", "NL", dec!(-250), dec!(21)),
        booked("P-001", "10-01-2025", "purchase", "Standard Rate", "NL", dec!(600), dec!(21)),
        booked("P-002", "11-02-2025", "purchase", "Zero Rated", "US", dec!(900), dec!(0)),
        booked("P-003", "12-02-2025", "purchase", "EU services", "IE", dec!(120), dec!(0)),
        // next quarter
        booked("S-004", "01-04-2025", "sale", "Standard VAT", "NL", dec!(1000), dec!(21)),
    ]
}

#[test]
fn test_quarterly_report_from_classified_book() {
    let company = CompanyInfo::new("Acme BV", "NL123456789B01");
    let report = aggregate(&q1_book(), &Period::quarter(2025, Quarter::Q1), &company);

    assert_eq!(report.coverage.total_invoices, 8);
    assert_eq!(report.coverage.invoices_in_period, 7);
    assert_eq!(report.coverage.uncategorized_lines, 0);

    let b1a = report.category(VatBox::Box1a).unwrap();
    assert_eq!(b1a.transactions.len(), 2);
    assert_eq!(b1a.totals.net, dec!(1750.00));
    assert_eq!(b1a.totals.vat, dec!(367.50));

    assert_eq!(report.category(VatBox::Box1b).unwrap().totals.vat, dec!(36.00));
    assert_eq!(report.category(VatBox::Box3b).unwrap().totals.net, dec!(1500.00));
    assert_eq!(report.category(VatBox::Box4a).unwrap().totals.net, dec!(900.00));
    assert_eq!(report.category(VatBox::Box4b).unwrap().totals.net, dec!(120.00));
    assert_eq!(report.category(VatBox::Box5b).unwrap().totals.vat, dec!(126.00));

    // 420 + 36 - 52.50 collected; 126 deductible
    assert_eq!(report.vat_calculation.vat_collected, dec!(403.50));
    assert_eq!(report.vat_calculation.vat_deductible, dec!(126.00));
    assert_eq!(report.vat_calculation.vat_payable, dec!(277.50));
    assert_eq!(report.company_info.company_vat, "NL123456789B01");
    assert_eq!(report.company_info.reporting_period, "Q1 2025 (Jan-Mar)");
}

#[test]
fn test_return_agrees_with_report() {
    let period = Period::quarter(2025, Quarter::Q1);
    let book = q1_book();
    let report = aggregate(&book, &period, &CompanyInfo::default());
    let decl = declare(&book, &period, &CompanyInfo::default());

    assert_eq!(decl.row("5a").unwrap().vat, report.vat_calculation.vat_collected);
    assert_eq!(decl.row("5b").unwrap().vat, report.vat_calculation.vat_deductible);
    assert_eq!(decl.total(), report.vat_calculation.vat_payable);
    assert_eq!(decl.row("3b").unwrap().net_amount, Some(dec!(1500.00)));
    assert_eq!(decl.row("4a").unwrap().net_amount, Some(dec!(900.00)));
}

#[test]
fn test_yearly_report_spans_quarters() {
    let report = aggregate(&q1_book(), &Period::year(2025), &CompanyInfo::default());
    let breakdown = report.quarterly_breakdown.unwrap();
    assert_eq!(breakdown[&Quarter::Q1].vat_payable, dec!(277.50));
    assert_eq!(breakdown[&Quarter::Q2].vat_collected, dec!(210.00));
    assert_eq!(breakdown[&Quarter::Q3].vat_payable, dec!(0.00));
    assert_eq!(report.vat_calculation.vat_payable, dec!(487.50));
}

#[test]
fn test_month_report() {
    let report = aggregate(&q1_book(), &Period::month(2025, 2), &CompanyInfo::default());
    assert_eq!(report.period, "Feb 2025");
    assert_eq!(report.coverage.invoices_in_period, 3);
    assert_eq!(report.vat_calculation.vat_collected, dec!(0.00));
    assert_eq!(report.vat_calculation.vat_deductible, dec!(0.00));
}
