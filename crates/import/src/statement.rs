use std::path::Path;

use lettrage_core::Transaction;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::columns::{map_structured_columns, AmountColumns};
use crate::csv::read_delimited;
use crate::pdf::{page_candidates, PdfPage};
use crate::spreadsheet::read_spreadsheet;
use crate::table::RawTable;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] lettrage_pdf::PdfError),
    #[error("Could not read the file with any of the separators , ; tab |")]
    UnreadableDelimited,
    #[error("Could not detect the date, description and amount columns ({0})")]
    MissingColumns(String),
    #[error("No transactions found in PDF statement")]
    NoTransactions,
    #[error("Workbook has no worksheet")]
    EmptyWorkbook,
    #[error("Unsupported statement format: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Delimited,
    Spreadsheet,
    Pdf,
}

impl StatementFormat {
    /// Guess the format from a file name. Files without an extension are
    /// read as delimited text.
    pub fn from_name(name: &str) -> Result<Self, StatementError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match ext.as_deref() {
            None | Some("csv" | "tsv" | "txt") => Ok(StatementFormat::Delimited),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(StatementFormat::Spreadsheet),
            Some("pdf") => Ok(StatementFormat::Pdf),
            Some(other) => Err(StatementError::Unsupported(other.to_string())),
        }
    }
}

/// Load and normalize a statement file.
pub fn load_statement(path: &Path) -> Result<Vec<Transaction>, StatementError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = StatementFormat::from_name(&name)?;
    let data = std::fs::read(path)?;
    load_statement_bytes(format, &data)
}

/// Normalize a statement already held in memory.
pub fn load_statement_bytes(format: StatementFormat, data: &[u8]) -> Result<Vec<Transaction>, StatementError> {
    let transactions = match format {
        StatementFormat::Delimited => normalize_structured(&read_delimited(data)?)?,
        StatementFormat::Spreadsheet => normalize_structured(&read_spreadsheet(data)?)?,
        StatementFormat::Pdf => {
            let pages: Vec<PdfPage> = lettrage_pdf::extract_pages(data)?
                .into_iter()
                .map(PdfPage::from_text)
                .collect();
            normalize_pdf_pages(&pages)?
        }
    };
    info!(?format, transactions = transactions.len(), "statement loaded");
    Ok(transactions)
}

/// Map the table's columns once, then turn every row into a transaction.
/// Rows without a parsable date or amount are dropped.
pub fn normalize_structured(table: &RawTable) -> Result<Vec<Transaction>, StatementError> {
    let mapping = map_structured_columns(&table.headers)
        .ok_or_else(|| StatementError::MissingColumns(table.headers.join(", ")))?;

    let mut dropped = 0usize;
    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let date = RawTable::cell(row, mapping.date).to_date();
        let amount = match mapping.amount {
            AmountColumns::Single(i) => RawTable::cell(row, i).to_amount(),
            AmountColumns::Split { debit, credit } => split_amount(
                debit.and_then(|i| RawTable::cell(row, i).to_amount()),
                credit.and_then(|i| RawTable::cell(row, i).to_amount()),
            ),
        };
        match (date, amount) {
            (Some(date), Some(amount)) => {
                let description = RawTable::cell(row, mapping.description).to_text();
                out.push(Transaction::new(date, description, amount));
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "rows without a usable date or amount");
    }
    Ok(out)
}

/// Normalize PDF statement pages. An empty result is an error.
pub fn normalize_pdf_pages(pages: &[PdfPage]) -> Result<Vec<Transaction>, StatementError> {
    let candidates = page_candidates(pages);
    let total = candidates.len();
    let out: Vec<Transaction> = candidates
        .into_iter()
        .filter_map(|c| c.into_transaction())
        .collect();

    if out.len() < total {
        debug!(dropped = total - out.len(), "rows without a usable date or amount");
    }
    if out.is_empty() {
        return Err(StatementError::NoTransactions);
    }
    Ok(out)
}

/// Combine a debit/credit pair into one signed amount. Debits are forced
/// negative and credits positive; zero counts as absent.
pub(crate) fn split_amount(debit: Option<Decimal>, credit: Option<Decimal>) -> Option<Decimal> {
    let debit = debit.filter(|d| !d.is_zero());
    let credit = credit.filter(|c| !c.is_zero());
    match (debit, credit) {
        (Some(d), _) => Some(-d.abs()),
        (None, Some(c)) => Some(c.abs()),
        (None, None) => None,
    }
}
