use lettrage_core::{AssignmentMode, InvoiceRecord, MatchResult, MatchingConfig, Transaction};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::util::partial_ratio;

/// Added to the description score when amounts agree exactly.
pub const EXACT_AMOUNT_BONUS: f64 = 5.0;

/// Pairs invoices with the statement line most likely to have settled them.
///
/// Every invoice is scored against every transaction that passes the amount
/// and date gates; the best-scoring transaction wins and ties keep the
/// earliest one.
pub struct MatchEngine {
    pub amount_tolerance: Decimal,
    pub max_days_delta: i64,
    pub mode: AssignmentMode,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl MatchEngine {
    pub fn new(amount_tolerance: Decimal, max_days_delta: i64) -> Self {
        Self {
            amount_tolerance,
            max_days_delta,
            mode: AssignmentMode::Greedy,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            amount_tolerance: config.amount_tolerance,
            max_days_delta: config.max_days_delta,
            mode: config.mode,
        }
    }

    pub fn with_mode(mut self, mode: AssignmentMode) -> Self {
        self.mode = mode;
        self
    }

    /// One result per invoice, in input order.
    pub fn match_invoices(&self, invoices: &[InvoiceRecord], transactions: &[Transaction]) -> Vec<MatchResult> {
        let mut claimed = vec![false; transactions.len()];
        let results: Vec<MatchResult> = invoices
            .iter()
            .map(|inv| match self.find_best_match(inv, transactions, &claimed) {
                Some((idx, score)) => {
                    if self.mode == AssignmentMode::Exclusive {
                        claimed[idx] = true;
                    }
                    debug!(invoice = %inv.filename, transaction = idx, score, "matched");
                    MatchResult::matched(inv, &transactions[idx], score)
                }
                None => {
                    debug!(invoice = %inv.filename, "no candidate");
                    MatchResult::unmatched(inv)
                }
            })
            .collect();

        info!(
            invoices = invoices.len(),
            matched = results.iter().filter(|r| r.matched).count(),
            "matching done"
        );
        results
    }

    fn find_best_match(
        &self,
        inv: &InvoiceRecord,
        transactions: &[Transaction],
        claimed: &[bool],
    ) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, tx) in transactions.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            let Some(score) = self.score_pair(inv, tx) else {
                continue;
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }
        best
    }

    /// `None` when the pair fails a gate, else the ranking score.
    fn score_pair(&self, inv: &InvoiceRecord, tx: &Transaction) -> Option<f64> {
        let total = inv.total_amount?;
        let gap = (tx.amount.abs() - total.abs()).abs();
        if gap > self.amount_tolerance {
            return None;
        }

        if let Some(inv_date) = inv.invoice_date {
            let days = (tx.date - inv_date).num_days();
            if days < 0 || days > self.max_days_delta {
                return None;
            }
        }

        let mut score = inv
            .invoice_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| description_score(n, &tx.description))
            .unwrap_or(0.0);
        if gap <= Decimal::new(1, 9) {
            score += EXACT_AMOUNT_BONUS;
        }
        Some(score)
    }
}

fn description_score(invoice_number: &str, description: &str) -> f64 {
    let a = invoice_number.to_lowercase();
    let b = description.to_lowercase();
    partial_ratio(&a, &b).max(partial_ratio(&b, &a))
}
