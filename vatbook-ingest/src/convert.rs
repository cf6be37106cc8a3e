//! Register entry → engine invoice.
//!
//! Direction, counterparty and country are inferred here, and entries that
//! arrive without a return code are classified from their label.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;
use tracing::debug;
use vatbook_core::{Direction, Invoice, Transaction, parse_percent};
use vatbook_finance::classify;

use crate::types::RegisterEntry;

static TAX_ID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<cc>[A-Z]{2})[0-9A-Z]{2,}$").expect("tax id pattern"));

/// English and local names seen in counterparty addresses.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("netherlands", "NL"),
    ("the netherlands", "NL"),
    ("nederland", "NL"),
    ("holland", "NL"),
    ("germany", "DE"),
    ("deutschland", "DE"),
    ("belgium", "BE"),
    ("belgië", "BE"),
    ("belgique", "BE"),
    ("france", "FR"),
    ("italy", "IT"),
    ("italia", "IT"),
    ("spain", "ES"),
    ("españa", "ES"),
    ("portugal", "PT"),
    ("poland", "PL"),
    ("polska", "PL"),
    ("romania", "RO"),
    ("greece", "GR"),
    ("czech republic", "CZ"),
    ("czechia", "CZ"),
    ("hungary", "HU"),
    ("sweden", "SE"),
    ("austria", "AT"),
    ("österreich", "AT"),
    ("bulgaria", "BG"),
    ("denmark", "DK"),
    ("finland", "FI"),
    ("ireland", "IE"),
    ("croatia", "HR"),
    ("lithuania", "LT"),
    ("latvia", "LV"),
    ("slovakia", "SK"),
    ("slovenia", "SI"),
    ("estonia", "EE"),
    ("cyprus", "CY"),
    ("luxembourg", "LU"),
    ("malta", "MT"),
    ("united kingdom", "GB"),
    ("great britain", "GB"),
    ("england", "GB"),
    ("uk", "GB"),
    ("united states", "US"),
    ("united states of america", "US"),
    ("usa", "US"),
    ("switzerland", "CH"),
    ("norway", "NO"),
    ("china", "CN"),
    ("india", "IN"),
    ("japan", "JP"),
    ("canada", "CA"),
    ("australia", "AU"),
    ("turkey", "TR"),
];

/// ISO code for a country name or two-letter code.
pub fn country_code(s: &str) -> Option<String> {
    let s = s.trim().trim_end_matches('.');
    let lower = s.to_lowercase();
    if let Some((_, code)) = COUNTRY_NAMES.iter().find(|(name, _)| *name == lower) {
        return Some(code.to_string());
    }
    if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(s.to_uppercase());
    }
    None
}

/// Country from the prefix of a VAT identification number. Greece uses EL.
pub fn country_from_tax_id(tax_id: &str) -> Option<String> {
    let clean: String = tax_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();
    let caps = TAX_ID_PREFIX.captures(&clean)?;
    Some(match &caps["cc"] {
        "EL" => "GR".to_string(),
        cc => cc.to_string(),
    })
}

/// Explicit field, else the last part of the counterparty address, else the
/// tax id prefix. Empty when nothing is known.
pub fn derive_country(explicit: Option<&str>, address: Option<&str>, tax_id: Option<&str>) -> String {
    if let Some(c) = explicit {
        return country_code(c).unwrap_or_else(|| c.trim().to_uppercase());
    }
    address
        .and_then(|a| a.rsplit(',').next())
        .and_then(country_code)
        .or_else(|| tax_id.and_then(country_from_tax_id))
        .unwrap_or_default()
}

/// Sales and purchases by name; otherwise a vendor means a purchase.
pub fn infer_direction(entry: &RegisterEntry) -> Direction {
    entry
        .kind
        .as_deref()
        .and_then(Direction::parse)
        .unwrap_or(if entry.vendor_name.is_some() {
            Direction::Purchase
        } else {
            Direction::Sale
        })
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

/// Invoice number used when the entry has none of its own.
pub fn fallback_invoice_number(entry: &RegisterEntry) -> Option<String> {
    entry.file_name.as_deref().map(file_stem)
}

pub fn to_invoice(entry: &RegisterEntry) -> Result<Invoice> {
    if entry.is_blank() {
        bail!("register entry has no date, identifier or amount");
    }

    let direction = infer_direction(entry);
    let (name, tax_id, address) = match direction {
        Direction::Purchase => (&entry.vendor_name, &entry.vendor_vat_id, &entry.vendor_address),
        Direction::Sale => (&entry.customer_name, &entry.customer_vat_id, &entry.customer_address),
    };
    let country = derive_country(entry.country.as_deref(), address.as_deref(), tax_id.as_deref());

    let rate = entry.vat_percentage.as_deref().unwrap_or("0");
    let label = entry.vat_category.as_deref().unwrap_or("");
    let (code, category_description) = match &entry.vat_category_code {
        Some(code) => (code.clone(), entry.vat_category_description.clone().unwrap_or_default()),
        None => {
            let code = classify(label, direction.as_str(), rate, &country);
            debug!(label, direction = direction.as_str(), rate, country = %country, %code, "classified entry");
            let description = entry
                .vat_category_description
                .clone()
                .unwrap_or_else(|| label.to_string());
            (code.code().to_string(), description)
        }
    };

    let line = Transaction::new(
        entry.description.clone().unwrap_or_default(),
        entry.net_amount.unwrap_or_default(),
        parse_percent(rate),
        code,
    )
    .with_category_description(category_description);

    let invoice_number = entry
        .invoice_number
        .clone()
        .or_else(|| fallback_invoice_number(entry))
        .unwrap_or_default();

    let mut invoice = Invoice::new(invoice_number, entry.date.clone().unwrap_or_default(), direction)
        .with_counterparty(name.clone().unwrap_or_default(), country)
        .with_totals(entry.net_amount, entry.vat_amount, entry.gross_amount)
        .with_transaction(line);
    invoice.counterparty_tax_id = tax_id.clone().unwrap_or_default();
    invoice.source_file = entry.file_name.clone().unwrap_or_default();
    Ok(invoice)
}
