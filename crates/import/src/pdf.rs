use lettrage_core::{parse_amount, parse_date, re, Transaction};
use rust_decimal::Decimal;
use tracing::debug;

use crate::columns::{map_header_row, AmountColumns, ColumnMapping};
use crate::statement::split_amount;

/// One statement page as handed over by a PDF collaborator: its plain text
/// and any table grids detected on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub text: String,
    pub tables: Vec<Vec<Vec<String>>>,
}

impl PdfPage {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
        }
    }
}

/// A row lifted from a page before its date and amount are re-normalized.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub date: String,
    pub description: String,
    pub amount: Option<Decimal>,
}

impl Candidate {
    pub fn into_transaction(self) -> Option<Transaction> {
        let date = parse_date(&self.date)?;
        Some(Transaction::new(date, self.description, self.amount?))
    }
}

// Leading date token, free text, trailing amount (optionally followed by a
// currency marker). A plain space may group thousands only when the amount
// is set off from the description by two or more spaces; otherwise
// "CB CARREFOUR 75 250,00" would read as 75250.
re!(re_statement_line,
    r"^\s*(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}|\d{4}-\d{2}-\d{2})\s+(.+?)(?:\s{2,}([+-]?\s?(?:\d{1,3}(?:[ \u{a0}\u{202f}.,]\d{3})+|\d+)(?:[.,]\d{2})?)|\s+([+-]?\s?(?:\d{1,3}(?:[\u{a0}\u{202f}.,]\d{3})+|\d+)(?:[.,]\d{2})?))\s*(?:€|EUR)?\s*$");

const HEADER_SEARCH_ROWS: usize = 5;

/// Candidates from every page, in page order. Tables come first; a page
/// whose tables yield nothing falls back to its text lines.
pub(crate) fn page_candidates(pages: &[PdfPage]) -> Vec<Candidate> {
    let mut out = Vec::new();
    for (n, page) in pages.iter().enumerate() {
        let from_tables: Vec<Candidate> = page.tables.iter().flat_map(|t| table_candidates(t)).collect();
        if from_tables.is_empty() {
            let from_text = text_candidates(&page.text);
            debug!(page = n + 1, rows = from_text.len(), "statement page read from text lines");
            out.extend(from_text);
        } else {
            debug!(page = n + 1, rows = from_tables.len(), "statement page read from tables");
            out.extend(from_tables);
        }
    }
    out
}

fn table_candidates(table: &[Vec<String>]) -> Vec<Candidate> {
    let Some(header_idx) = table
        .iter()
        .take(HEADER_SEARCH_ROWS)
        .position(|row| row.iter().filter(|c| !c.trim().is_empty()).count() >= 2)
    else {
        return Vec::new();
    };
    let Some(mapping) = map_header_row(&table[header_idx]) else {
        debug!(header = ?table[header_idx], "table header not recognized");
        return Vec::new();
    };

    table[header_idx + 1..]
        .iter()
        .map(|row| row_candidate(row, &mapping))
        .collect()
}

fn row_candidate(row: &[String], mapping: &ColumnMapping) -> Candidate {
    let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or_default();
    let amount = match mapping.amount {
        AmountColumns::Single(i) => parse_amount(cell(i)),
        AmountColumns::Split { debit, credit } => split_amount(
            debit.and_then(|i| parse_amount(cell(i))),
            credit.and_then(|i| parse_amount(cell(i))),
        ),
    };
    Candidate {
        date: cell(mapping.date).to_string(),
        description: cell(mapping.description).to_string(),
        amount,
    }
}

fn text_candidates(text: &str) -> Vec<Candidate> {
    text.lines()
        .filter_map(|line| {
            let c = re_statement_line().captures(line)?;
            Some(Candidate {
                date: c.get(1)?.as_str().to_string(),
                description: c.get(2)?.as_str().trim().to_string(),
                amount: parse_amount(c.get(3).or_else(|| c.get(4))?.as_str()),
            })
        })
        .collect()
}
