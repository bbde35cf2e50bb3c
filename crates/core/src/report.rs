use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::InvoiceRecord;
use crate::transaction::Transaction;

/// Outcome of matching one invoice against a statement.
///
/// Bank fields and the score are only populated when `matched` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub filename: String,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub matched: bool,
    pub match_score: Option<f64>,
    pub bank_date: Option<NaiveDate>,
    pub bank_amount: Option<Decimal>,
    pub bank_description: Option<String>,
}

impl MatchResult {
    pub fn unmatched(invoice: &InvoiceRecord) -> Self {
        MatchResult {
            filename: invoice.filename.clone(),
            invoice_number: invoice.invoice_number.clone(),
            invoice_date: invoice.invoice_date,
            total_amount: invoice.total_amount,
            matched: false,
            match_score: None,
            bank_date: None,
            bank_amount: None,
            bank_description: None,
        }
    }

    pub fn matched(invoice: &InvoiceRecord, tx: &Transaction, score: f64) -> Self {
        MatchResult {
            matched: true,
            match_score: Some(score),
            bank_date: Some(tx.date),
            bank_amount: Some(tx.amount),
            bank_description: Some(tx.description.clone()),
            ..Self::unmatched(invoice)
        }
    }
}
