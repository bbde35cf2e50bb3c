use chrono::NaiveDate;
use lettrage_core::{decimal_from_f64, parse_amount, parse_date, re};
use rust_decimal::Decimal;

re!(re_numeric_literal, r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$");

static EMPTY: Cell = Cell::Empty;

/// A typed statement cell, as produced by a spreadsheet reader or by type
/// inference over a delimited file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Infer a cell from a delimited-text field: blank fields are empty and
    /// plain numeric literals (`-12.5`, `100`, `1e3`) become numbers.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if re_numeric_literal().is_match(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return Cell::Number(n);
            }
        }
        Cell::Text(field.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date(s),
            Cell::Number(_) | Cell::Empty => None,
        }
    }

    pub fn to_amount(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) => decimal_from_f64(*n),
            Cell::Text(s) => parse_amount(s),
            Cell::Date(_) | Cell::Empty => None,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.to_string(),
        }
    }
}

/// A header row plus data rows. Rows may be shorter than the header; missing
/// trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    pub fn cell(row: &[Cell], col: usize) -> &Cell {
        row.get(col).unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn infers_numbers_from_plain_literals() {
        assert_eq!(Cell::from_field("-150.00"), Cell::Number(-150.0));
        assert_eq!(Cell::from_field("42"), Cell::Number(42.0));
        assert_eq!(Cell::from_field(" "), Cell::Empty);
    }

    #[test]
    fn locale_amounts_stay_text() {
        assert_eq!(Cell::from_field("-150,00"), Cell::Text("-150,00".into()));
        assert_eq!(Cell::from_field("1 234,56"), Cell::Text("1 234,56".into()));
        assert_eq!(Cell::from_field("nan"), Cell::Text("nan".into()));
        assert_eq!(Cell::from_field("inf"), Cell::Text("inf".into()));
    }

    #[test]
    fn amount_from_either_representation() {
        let expected = Decimal::from_str("-1234.56").unwrap();
        assert_eq!(Cell::Number(-1234.56).to_amount(), Some(expected));
        assert_eq!(Cell::Text("-1 234,56".into()).to_amount(), Some(expected));
        assert_eq!(Cell::Empty.to_amount(), None);
    }

    #[test]
    fn date_from_text_or_typed() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(Cell::Text("15/01/2024".into()).to_date(), Some(d));
        assert_eq!(Cell::Date(d).to_date(), Some(d));
        assert_eq!(Cell::Number(45306.0).to_date(), None);
    }

    #[test]
    fn short_rows_read_as_empty() {
        let row = vec![Cell::Text("a".into())];
        assert_eq!(RawTable::cell(&row, 3), &Cell::Empty);
    }
}
