//! Bank statement loading and invoice-to-payment matching.

pub mod columns;
pub mod csv;
pub mod match_engine;
pub mod pdf;
pub mod spreadsheet;
pub mod statement;
pub mod table;
pub(crate) mod util;

pub use columns::{map_header_row, map_structured_columns, AmountColumns, ColumnMapping};
pub use match_engine::MatchEngine;
pub use pdf::PdfPage;
pub use statement::{
    load_statement, load_statement_bytes, normalize_pdf_pages, normalize_structured, StatementError,
    StatementFormat,
};
pub use table::{Cell, RawTable};
