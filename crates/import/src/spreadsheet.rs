use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use lettrage_core::parse_date;
use tracing::debug;

use crate::statement::StatementError;
use crate::table::{Cell, RawTable};

/// Read the first worksheet of an `.xlsx`/`.xls`/`.ods` workbook. The first
/// row is the header.
pub fn read_spreadsheet(data: &[u8]) -> Result<RawTable, StatementError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(StatementError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(RawTable::default()),
    };
    let rows: Vec<Vec<Cell>> = rows
        .filter(|row| !row.iter().all(|c| matches!(c, Data::Empty)))
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    debug!(rows = rows.len(), "spreadsheet statement");
    Ok(RawTable::new(headers, rows))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(_) => match data.as_datetime() {
            Some(dt) => Cell::Date(dt.date()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) => parse_date(s).map_or_else(|| Cell::Text(s.clone()), Cell::Date),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
