use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "EUR";

/// Fields recovered from a single invoice's text, before the source
/// document is attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub currency: Option<String>,
}

impl InvoiceFields {
    /// Replace every field for which `other` carries a meaningful value
    /// (non-blank text, a non-zero amount, any date).
    pub fn overlay(&mut self, other: InvoiceFields) {
        if let Some(n) = other.invoice_number.filter(|s| !s.trim().is_empty()) {
            self.invoice_number = Some(n);
        }
        if let Some(d) = other.invoice_date {
            self.invoice_date = Some(d);
        }
        if let Some(t) = other.total_amount.filter(|t| !t.is_zero()) {
            self.total_amount = Some(t);
        }
        if let Some(c) = other.currency.filter(|s| !s.trim().is_empty()) {
            self.currency = Some(c);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.invoice_date.is_none()
            && self.total_amount.is_none()
            && self.currency.is_none()
    }
}

/// One extracted invoice. Built once per source document and never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub filename: String,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub currency: String,
    /// Full extracted text, kept for audit. Never part of tabular output.
    #[serde(skip_serializing, default)]
    pub raw_text: String,
}

impl InvoiceRecord {
    pub fn new(filename: impl Into<String>, fields: InvoiceFields, raw_text: impl Into<String>) -> Self {
        InvoiceRecord {
            filename: filename.into(),
            invoice_number: fields.invoice_number,
            invoice_date: fields.invoice_date,
            total_amount: fields.total_amount,
            currency: fields.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            raw_text: raw_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fields(number: Option<&str>, total: Option<&str>) -> InvoiceFields {
        InvoiceFields {
            invoice_number: number.map(str::to_string),
            invoice_date: None,
            total_amount: total.map(|t| Decimal::from_str(t).unwrap()),
            currency: None,
        }
    }

    #[test]
    fn overlay_replaces_meaningful_values() {
        let mut base = fields(Some("F-001"), Some("10.00"));
        base.overlay(InvoiceFields {
            invoice_number: Some("F-2024-001".into()),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            total_amount: Some(Decimal::from_str("120.00").unwrap()),
            currency: Some("EUR".into()),
        });
        assert_eq!(base.invoice_number.as_deref(), Some("F-2024-001"));
        assert_eq!(base.invoice_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(base.total_amount, Some(Decimal::from_str("120").unwrap()));
        assert_eq!(base.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn overlay_keeps_heuristic_values_on_falsy_input() {
        let mut base = fields(Some("F-001"), Some("10.00"));
        base.overlay(InvoiceFields {
            invoice_number: Some("  ".into()),
            invoice_date: None,
            total_amount: Some(Decimal::ZERO),
            currency: Some(String::new()),
        });
        assert_eq!(base, fields(Some("F-001"), Some("10.00")));
    }

    #[test]
    fn record_defaults_currency_to_eur() {
        let r = InvoiceRecord::new("a.pdf", InvoiceFields::default(), "");
        assert_eq!(r.currency, "EUR");
        assert!(r.invoice_number.is_none());
    }

    #[test]
    fn raw_text_is_not_serialized() {
        let r = InvoiceRecord::new("a.pdf", fields(Some("F-1"), None), "secret body");
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("secret body"));
        assert!(json.contains("\"filename\":\"a.pdf\""));
    }

    #[test]
    fn is_empty_on_default() {
        assert!(InvoiceFields::default().is_empty());
        assert!(!fields(Some("X"), None).is_empty());
    }
}
