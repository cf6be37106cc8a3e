use rust_decimal_macros::dec;
use std::collections::BTreeSet;
use std::path::PathBuf;
use vatbook_core::{CompanyInfo, Period, Quarter, VatBox};
use vatbook_finance::{PayableStatus, PayableSummary, aggregate, declare};
use vatbook_ingest::parsers::parse_register_json;
use vatbook_ingest::{InvoiceBook, load_register_file};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join(name)
}

fn json_book() -> InvoiceBook {
    let records = load_register_file(fixture("register.json")).expect("should parse register.json");
    let mut book = InvoiceBook::new();
    book.ingest(records);
    book
}

#[test]
fn test_ingest_json_register() {
    let records = load_register_file(fixture("register.json")).unwrap();
    assert_eq!(records.len(), 8);

    let mut book = InvoiceBook::new();
    let outcome = book.ingest(records);
    assert_eq!(outcome.processed, 6);
    assert_eq!(outcome.skipped, 1, "copy of 2025-001 is a duplicate");
    assert_eq!(outcome.errors, 1, "failed extraction is counted");
    assert_eq!(outcome.updated_years, BTreeSet::from([Some(2025)]));

    // ingesting the same export again books nothing new
    let again = book.ingest(load_register_file(fixture("register.json")).unwrap());
    assert_eq!(again.processed, 0);
    assert_eq!(again.skipped, 7);
    assert_eq!(book.len(), 6);
}

#[test]
fn test_classified_fields() {
    let book = json_book();
    let invoices = book.invoices(Some(2025));

    let licence = invoices.iter().find(|i| i.invoice_number == "2025-002").unwrap();
    assert_eq!(licence.counterparty_country, "DE");
    assert_eq!(licence.transactions[0].category_code, "3b");

    let hosting = invoices.iter().find(|i| i.source_file == "aws_2025_02.pdf").unwrap();
    assert_eq!(hosting.invoice_number, "aws_2025_02");
    assert!(!hosting.is_sale(), "vendor name implies a purchase");
    assert_eq!(hosting.counterparty_country, "LU");
    assert_eq!(hosting.net_total, Some(dec!(110)));
    assert_eq!(hosting.tax_total, None);
    assert_eq!(hosting.transactions[0].category_code, "4b");
}

#[test]
fn test_quarterly_report_from_json_register() {
    let book = json_book();
    let company = CompanyInfo::new("Vatbook Demo BV", "NL000099998B57");
    let report = aggregate(book.invoices(Some(2025)), &Period::quarter(2025, Quarter::Q1), &company);

    assert_eq!(report.coverage.invoices_in_period, 5);
    let b1a = report.category(VatBox::Box1a).unwrap();
    assert_eq!(b1a.totals.net, dec!(1750.00));
    assert_eq!(b1a.totals.vat, dec!(367.50));
    assert!(b1a.transactions.iter().all(|t| t.customer_name.as_deref() == Some("Acme BV")));
    assert_eq!(report.category(VatBox::Box3b).unwrap().totals.net, dec!(1500.00));
    assert_eq!(report.category(VatBox::Box4b).unwrap().totals.net, dec!(110.00));

    assert_eq!(report.vat_calculation.vat_collected, dec!(367.50));
    assert_eq!(report.vat_calculation.vat_deductible, dec!(126.00));
    assert_eq!(report.vat_calculation.vat_payable, dec!(241.50));
}

#[test]
fn test_return_and_payable_from_json_register() {
    let book = json_book();
    let invoices = book.invoices(Some(2025));

    let decl = declare(invoices, &Period::quarter(2025, Quarter::Q1), &CompanyInfo::default());
    assert_eq!(decl.row("5a").unwrap().vat, dec!(367.50));
    assert_eq!(decl.row("5b").unwrap().vat, dec!(126.00));
    assert_eq!(decl.total(), dec!(241.50));
    assert_eq!(decl.row("4b").unwrap().net_amount, Some(dec!(110.00)));

    let year = aggregate(invoices, &Period::year(2025), &CompanyInfo::default());
    let breakdown = year.quarterly_breakdown.as_ref().unwrap();
    assert_eq!(breakdown[&Quarter::Q2].vat_collected, dec!(210.00));
    assert_eq!(year.vat_calculation.vat_collected, dec!(577.50));

    let payable = PayableSummary::from_invoices(2025, invoices);
    assert_eq!(payable.vat_collected, dec!(577.50));
    assert_eq!(payable.vat_paid, dec!(126.00));
    assert_eq!(payable.vat_payable, dec!(451.50));
    assert_eq!(payable.status, PayableStatus::PaymentDue);
}

#[test]
fn test_csv_register_to_return() {
    let mut book = InvoiceBook::new();
    let outcome = book.ingest(load_register_file(fixture("register.csv")).unwrap());
    assert_eq!(outcome.processed, 3);

    let invoices = book.invoices(Some(2025));
    let q1 = Period::quarter(2025, Quarter::Q1);

    let report = aggregate(invoices, &q1, &CompanyInfo::default());
    assert_eq!(report.category(VatBox::Box1b).unwrap().totals.vat, dec!(90.00));
    assert_eq!(report.category(VatBox::Box4c).unwrap().totals.net, dec!(400.00));
    assert_eq!(report.category(VatBox::Box2a).unwrap().totals.net, dec!(500.00));

    let decl = declare(invoices, &q1, &CompanyInfo::default());
    assert_eq!(decl.row("4a").unwrap().net_amount, Some(dec!(400.00)));
    assert_eq!(decl.row("2a").unwrap().net_amount, Some(dec!(500.00)));
    assert_eq!(decl.total(), dec!(90.00));
}

#[test]
fn test_absurd_rate_does_not_abort_the_report() {
    let records = parse_register_json(
        r#"[{"Date": "10-01-2025", "Type": "Sales", "Nett Amount": 100, "VAT %": "1e27",
             "VAT Category (NL) Code": "1a", "File Name": "odd.pdf"},
            {"Date": "11-01-2025", "Type": "Sales", "Nett Amount": 200, "VAT %": "21",
             "VAT Category (NL) Code": "1a", "File Name": "fine.pdf"}]"#,
    )
    .unwrap();
    let mut book = InvoiceBook::new();
    assert_eq!(book.ingest(records).processed, 2);

    let q1 = Period::quarter(2025, Quarter::Q1);
    let report = aggregate(book.invoices(Some(2025)), &q1, &CompanyInfo::default());
    let b1a = report.category(VatBox::Box1a).unwrap();
    assert_eq!(b1a.totals.net, dec!(300.00));
    assert_eq!(b1a.totals.vat, dec!(42.00));

    let decl = declare(book.invoices(Some(2025)), &q1, &CompanyInfo::default());
    assert_eq!(decl.total(), dec!(42.00));
}
