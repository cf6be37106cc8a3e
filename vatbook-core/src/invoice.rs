//! Invoice and transaction records as handed to the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether VAT on an invoice is collected (sale) or deductible (purchase).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "sale")]
    Sale,
    #[serde(rename = "purchase")]
    Purchase,
}

impl Direction {
    /// Parse a free-text transaction type. Accepts singular and plural forms,
    /// case-insensitive. Anything else (e.g. "Unclassified") is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sale" | "sales" => Some(Direction::Sale),
            "purchase" | "purchases" => Some(Direction::Purchase),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sale => "sale",
            Direction::Purchase => "purchase",
        }
    }
}

/// One taxable line item within an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub description: String,
    /// Negative for credit notes / corrections
    pub amount_before_tax: Decimal,
    pub tax_percent: Decimal,
    /// Canonical return code ("1a", "5b", ...). May be empty or a free-text
    /// label when upstream could not classify.
    #[serde(default)]
    pub category_code: String,
    #[serde(default)]
    pub category_description: String,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount_before_tax: Decimal,
        tax_percent: Decimal,
        category_code: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount_before_tax,
            tax_percent,
            category_code: category_code.into(),
            category_description: String::new(),
        }
    }

    pub fn with_category_description(mut self, description: impl Into<String>) -> Self {
        self.category_description = description.into();
        self
    }
}

/// An invoice from one counterparty on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub invoice_number: String,
    /// Raw date as received; parsed leniently when reports are built
    pub date: String,
    pub direction: Direction,
    #[serde(default)]
    pub counterparty_name: String,
    #[serde(default)]
    pub counterparty_country: String,
    #[serde(default)]
    pub counterparty_tax_id: String,
    pub net_total: Option<Decimal>,
    pub tax_total: Option<Decimal>,
    pub gross_total: Option<Decimal>,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Invoice {
    pub fn new(invoice_number: impl Into<String>, date: impl Into<String>, direction: Direction) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            date: date.into(),
            direction,
            counterparty_name: String::new(),
            counterparty_country: String::new(),
            counterparty_tax_id: String::new(),
            net_total: None,
            tax_total: None,
            gross_total: None,
            source_file: String::new(),
            transactions: Vec::new(),
        }
    }

    pub fn with_counterparty(mut self, name: impl Into<String>, country: impl Into<String>) -> Self {
        self.counterparty_name = name.into();
        self.counterparty_country = country.into();
        self
    }

    pub fn with_totals(mut self, net: Option<Decimal>, tax: Option<Decimal>, gross: Option<Decimal>) -> Self {
        self.net_total = net;
        self.tax_total = tax;
        self.gross_total = gross;
        self
    }

    pub fn with_transaction(mut self, txn: Transaction) -> Self {
        self.transactions.push(txn);
        self
    }

    /// Net amount at invoice level: net total, else gross total, else zero.
    pub fn effective_net(&self) -> Decimal {
        self.net_total.or(self.gross_total).unwrap_or(Decimal::ZERO)
    }

    /// Invoice-level tax total, zero when absent.
    pub fn effective_tax(&self) -> Decimal {
        self.tax_total.unwrap_or(Decimal::ZERO)
    }

    pub fn is_sale(&self) -> bool {
        self.direction == Direction::Sale
    }

    /// Transactions to process. An invoice without line items yields a single
    /// transaction synthesized from its invoice-level totals.
    pub fn line_items(&self) -> Vec<Transaction> {
        if !self.transactions.is_empty() {
            return self.transactions.clone();
        }
        let description = if self.counterparty_name.is_empty() {
            "N/A".to_string()
        } else {
            self.counterparty_name.clone()
        };
        vec![Transaction::new(description, self.effective_net(), Decimal::ZERO, "")]
    }
}

/// Company header printed on reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub vat_number: Option<String>,
}

impl CompanyInfo {
    pub fn new(name: impl Into<String>, vat_number: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            vat_number: Some(vat_number.into()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A")
    }

    pub fn display_vat_number(&self) -> &str {
        self.vat_number.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("Sales"), Some(Direction::Sale));
        assert_eq!(Direction::parse(" purchase "), Some(Direction::Purchase));
        assert_eq!(Direction::parse("Unclassified"), None);
        assert_eq!(Direction::parse(""), None);
    }

    #[test]
    fn test_synthesized_line_from_net_total() {
        let inv = Invoice::new("INV-1", "2025-01-10", Direction::Sale)
            .with_totals(Some(dec!(500)), Some(dec!(0)), None);
        let items = inv.line_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount_before_tax, dec!(500));
        assert_eq!(items[0].tax_percent, Decimal::ZERO);
        assert_eq!(items[0].category_code, "");
        assert_eq!(items[0].description, "N/A");
    }

    #[test]
    fn test_effective_net_falls_back_to_gross() {
        let inv = Invoice::new("INV-2", "2025-01-10", Direction::Purchase)
            .with_totals(None, None, Some(dec!(121)));
        assert_eq!(inv.effective_net(), dec!(121));
        assert_eq!(inv.effective_tax(), Decimal::ZERO);
    }

    #[test]
    fn test_company_info_placeholders() {
        let c = CompanyInfo::default();
        assert_eq!(c.display_name(), "N/A");
        assert_eq!(c.display_vat_number(), "N/A");
    }

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&Direction::Purchase).unwrap();
        assert_eq!(json, "\"purchase\"");
    }
}
