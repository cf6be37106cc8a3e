use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vatbook_core::parse_amount;

/// Normalized output of register parsers (format-agnostic). Every field is
/// optional: analyzed invoices arrive with whatever the extraction produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub date: Option<String>,
    /// Free-text type: "Sales", "Purchase", "Unclassified", ...
    pub kind: Option<String>,
    pub invoice_number: Option<String>,
    pub file_name: Option<String>,
    pub description: Option<String>,
    pub vendor_name: Option<String>,
    pub customer_name: Option<String>,
    pub vendor_vat_id: Option<String>,
    pub customer_vat_id: Option<String>,
    pub vendor_address: Option<String>,
    pub customer_address: Option<String>,
    pub country: Option<String>,
    pub net_amount: Option<Decimal>,
    pub vat_amount: Option<Decimal>,
    pub gross_amount: Option<Decimal>,
    /// Raw rate as written ("21", "21%", "9.0")
    pub vat_percentage: Option<String>,
    /// Return code supplied upstream, if any
    pub vat_category_code: Option<String>,
    pub vat_category_description: Option<String>,
    /// Free-text category label, classified when no code is supplied
    pub vat_category: Option<String>,
}

/// One record read from an input file.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Entry(RegisterEntry),
    /// An item the extraction step marked as failed, or that is not an object
    Rejected { file_name: Option<String>, reason: String },
}

const DATE: &[&str] = &["date", "Date", "Invoice Date", "invoice_date"];
const KIND: &[&str] = &["type", "Type", "transaction_type"];
const INVOICE_NUMBER: &[&str] = &[
    "invoice_number",
    "invoice_no",
    "Invoice Number",
    "Invoice No",
    "Invoice_Number",
];
const FILE_NAME: &[&str] = &["file_name", "File Name", "source_file"];
const DESCRIPTION: &[&str] = &["description", "Description"];
const VENDOR_NAME: &[&str] = &["vendor_name", "Vendor Name", "vendor"];
const CUSTOMER_NAME: &[&str] = &["customer_name", "Customer Name", "customer"];
const VENDOR_VAT_ID: &[&str] = &["vendor_vat_id", "Vendor VAT ID"];
const CUSTOMER_VAT_ID: &[&str] = &["customer_vat_id", "Customer VAT ID"];
const VENDOR_ADDRESS: &[&str] = &["vendor_address", "Vendor Address"];
const CUSTOMER_ADDRESS: &[&str] = &["customer_address", "Customer Address"];
const COUNTRY: &[&str] = &["country", "Country"];
// EUR-converted columns first
const NET_AMOUNT: &[&str] = &[
    "Nett Amount (EUR)",
    "Net Amount (EUR)",
    "net_amount",
    "Net Amount",
    "Nett Amount",
];
const VAT_AMOUNT: &[&str] = &["VAT Amount (EUR)", "vat_amount", "VAT Amount"];
const GROSS_AMOUNT: &[&str] = &["Gross Amount (EUR)", "gross_amount", "Gross Amount"];
const VAT_PERCENTAGE: &[&str] = &["vat_percentage", "VAT %", "VAT Percentage"];
const VAT_CATEGORY_CODE: &[&str] = &[
    "VAT Category (NL) Code",
    "vat_category_nl_code",
    "vat_category_code",
    "VAT Category Code",
];
const VAT_CATEGORY_DESCRIPTION: &[&str] = &[
    "VAT Category (NL) Description",
    "vat_category_nl_description",
    "vat_category_description",
    "VAT Category Description",
];
const VAT_CATEGORY: &[&str] = &["vat_category", "VAT Category"];

/// Nested object some extractors attach with counterparty details.
const EXTRACTION_DATA: &str = "Full_Extraction_Data";

/// Text of a scalar value. Null, empty and NaN read as absent.
fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(s)
    }
}

fn first(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|n| fields.get(*n).and_then(text))
}

impl RegisterEntry {
    /// Build an entry from loosely-named fields. The first alias carrying a
    /// usable value wins; counterparty details fall back to the nested
    /// extraction object.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let nested = fields.get(EXTRACTION_DATA).and_then(Value::as_object);
        let with_nested = |names: &[&str]| {
            first(fields, names).or_else(|| nested.and_then(|n| first(n, names)))
        };
        let amount = |names: &[&str]| first(fields, names).map(|s| parse_amount(&s));

        Self {
            date: first(fields, DATE),
            kind: first(fields, KIND),
            invoice_number: first(fields, INVOICE_NUMBER),
            file_name: first(fields, FILE_NAME),
            description: first(fields, DESCRIPTION),
            vendor_name: with_nested(VENDOR_NAME),
            customer_name: with_nested(CUSTOMER_NAME),
            vendor_vat_id: with_nested(VENDOR_VAT_ID),
            customer_vat_id: with_nested(CUSTOMER_VAT_ID),
            vendor_address: with_nested(VENDOR_ADDRESS),
            customer_address: with_nested(CUSTOMER_ADDRESS),
            country: first(fields, COUNTRY),
            net_amount: amount(NET_AMOUNT),
            vat_amount: amount(VAT_AMOUNT),
            gross_amount: amount(GROSS_AMOUNT),
            vat_percentage: first(fields, VAT_PERCENTAGE),
            vat_category_code: first(fields, VAT_CATEGORY_CODE),
            vat_category_description: first(fields, VAT_CATEGORY_DESCRIPTION),
            vat_category: first(fields, VAT_CATEGORY),
        }
    }

    /// True when nothing identifies or quantifies the entry.
    pub fn is_blank(&self) -> bool {
        self.date.is_none()
            && self.invoice_number.is_none()
            && self.file_name.is_none()
            && self.net_amount.is_none()
            && self.vat_amount.is_none()
            && self.gross_amount.is_none()
    }
}
