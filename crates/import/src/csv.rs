use thiserror::Error;
use tracing::debug;

use crate::statement::StatementError;
use crate::table::{Cell, RawTable};

/// Separators tried in order; the first giving a multi-column header wins.
pub const SEPARATORS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Parse a delimited statement export, guessing its separator.
///
/// A separator is rejected when its header has a single column or when any
/// record has more fields than the header under it. Shorter records are kept
/// and read as padded with empty cells. Fields are decoded lossily so Latin-1
/// exports still load.
pub fn read_delimited(data: &[u8]) -> Result<RawTable, StatementError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    for sep in SEPARATORS {
        let shown = (sep as char).escape_default().to_string();
        match read_with_separator(data, sep) {
            Ok(table) if table.headers.len() > 1 => {
                debug!(separator = %shown, rows = table.rows.len(), "delimited statement");
                return Ok(table);
            }
            Ok(_) => debug!(separator = %shown, "single column, trying next separator"),
            Err(e) => debug!(separator = %shown, "rejected: {e}"),
        }
    }

    Err(StatementError::UnreadableDelimited)
}

#[derive(Debug, Error)]
enum Rejected {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line} has {found} fields, header has {expected}")]
    TooWide { line: u64, found: usize, expected: usize },
}

fn read_with_separator(data: &[u8], sep: u8) -> Result<RawTable, Rejected> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sep)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(Rejected::TooWide {
                line: record.position().map_or(0, |p| p.line()),
                found: record.len(),
                expected: headers.len(),
            });
        }
        if record.iter().all(|f| f.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }
        rows.push(
            record
                .iter()
                .map(|f| Cell::from_field(&String::from_utf8_lossy(f)))
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated() {
        let t = read_delimited(b"date,description,amount\n2024-01-15,VIR INV-042,-150.00\n").unwrap();
        assert_eq!(t.headers, vec!["date", "description", "amount"]);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0][2], Cell::Number(-150.0));
    }

    #[test]
    fn semicolon_with_french_amounts() {
        let data = "Date;Libellé;Montant\n15/01/2024;VIR INV-042;-150,00\n20/01/2024;CB CAFE;-3,50\n";
        let t = read_delimited(data.as_bytes()).unwrap();
        assert_eq!(t.headers.len(), 3);
        assert_eq!(t.headers[1], "Libellé");
        assert_eq!(t.rows[0][2], Cell::Text("-150,00".into()));
    }

    #[test]
    fn tab_and_pipe() {
        let t = read_delimited(b"date\tlabel\tamount\n2024-01-15\tX\t1\n").unwrap();
        assert_eq!(t.headers.len(), 3);
        let t = read_delimited(b"date|label|amount\n2024-01-15|X|1\n").unwrap();
        assert_eq!(t.headers.len(), 3);
    }

    #[test]
    fn ragged_comma_split_falls_through_to_semicolon() {
        // Under ',' the French decimals make records longer than the header.
        let data = b"Date;Libelle;Montant\n15/01/2024;VIR;-150,00\n";
        let t = read_delimited(data).unwrap();
        assert_eq!(t.headers, vec!["Date", "Libelle", "Montant"]);
    }

    #[test]
    fn short_footer_row_is_kept_not_rejected() {
        let data = "Date;Libelle;Montant\n15/01/2024;VIR INV-042;-150,00\nSolde final;1234,56\n";
        let t = read_delimited(data.as_bytes()).unwrap();
        assert_eq!(t.headers, vec!["Date", "Libelle", "Montant"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1].len(), 2);
        assert_eq!(RawTable::cell(&t.rows[1], 2), &Cell::Empty);
    }

    #[test]
    fn record_wider_than_header_rejects_separator() {
        assert!(matches!(
            read_delimited(b"date,label,amount\n2024-01-15,X,1,extra\n"),
            Err(StatementError::UnreadableDelimited)
        ));
    }

    #[test]
    fn single_column_everywhere_is_unreadable() {
        assert!(matches!(
            read_delimited(b"just one column\nvalue\n"),
            Err(StatementError::UnreadableDelimited)
        ));
    }

    #[test]
    fn strips_bom_and_blank_lines() {
        let t = read_delimited(b"\xEF\xBB\xBFdate,label,amount\n2024-01-15,X,1\n,,\n").unwrap();
        assert_eq!(t.headers[0], "date");
        assert_eq!(t.rows.len(), 1);
    }

    #[test]
    fn latin1_is_decoded_lossily() {
        let t = read_delimited(b"Date;Libell\xe9;Montant\n15/01/2024;VIR;-1,00\n").unwrap();
        assert!(t.headers[1].starts_with("Libell"));
    }
}
