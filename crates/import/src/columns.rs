use lettrage_core::normalize_label;
use tracing::debug;

use crate::util::partial_ratio;

/// Where a statement table keeps its amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// One signed amount column.
    Single(usize),
    /// Separate debit and credit columns; at least one is present.
    Split {
        debit: Option<usize>,
        credit: Option<usize>,
    },
}

/// Column positions resolved once for a whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: usize,
    pub description: usize,
    pub amount: AmountColumns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Date,
    Description,
    Amount,
    Debit,
    Credit,
}

// ── Text header rows (PDF tables) ────────────────────────────────────────────

/// Evaluated in order; a column claimed by an earlier rule is not reused.
const HEADER_RULES: &[(Field, &[&str])] = &[
    (Field::Date, &["date"]),
    (Field::Description, &["description", "libelle", "label", "narration", "details"]),
    (Field::Amount, &["montant", "amount", "solde"]),
    (Field::Debit, &["debit", "retrait"]),
    (Field::Credit, &["credit", "versement"]),
];

/// Map a free-text header row by substring containment over normalized
/// labels. Fails unless a date, a description and some amount source are
/// found.
pub fn map_header_row(headers: &[String]) -> Option<ColumnMapping> {
    let labels: Vec<String> = headers.iter().map(|h| normalize_label(h)).collect();
    let mut claimed: Vec<usize> = Vec::new();
    let mut found = [None; 5];

    for (slot, (field, vocabulary)) in HEADER_RULES.iter().enumerate() {
        let hit = vocabulary.iter().find_map(|word| {
            labels
                .iter()
                .enumerate()
                .find(|(i, label)| !claimed.contains(i) && label.contains(word))
                .map(|(i, _)| i)
        });
        if let Some(i) = hit {
            debug!(?field, column = i, header = %headers[i], "header column");
            claimed.push(i);
            found[slot] = Some(i);
        }
    }

    let [date, description, amount, debit, credit] = found;
    let amount = match (amount, debit, credit) {
        (Some(a), _, _) => AmountColumns::Single(a),
        (None, None, None) => return None,
        (None, debit, credit) => AmountColumns::Split { debit, credit },
    };
    Some(ColumnMapping {
        date: date?,
        description: description?,
        amount,
    })
}

// ── Named columns (spreadsheet / CSV) ────────────────────────────────────────

const DATE_CANDIDATES: &[&str] = &[
    "date",
    "operation date",
    "transaction date",
    "booking date",
    "valeur",
    "date operation",
];
const DESCRIPTION_CANDIDATES: &[&str] = &[
    "description",
    "label",
    "libellé",
    "libelle",
    "narration",
    "detail",
    "details",
];
const AMOUNT_CANDIDATES: &[&str] = &["amount", "montant", "debit/credit", "debit", "credit"];
const SIGNED_AMOUNT_LABELS: &[&str] = &["amount", "montant", "debit/credit"];

/// Map spreadsheet/CSV column names: exact lookup of the lower-cased,
/// trimmed name against each candidate in order, then the column with the
/// highest partial similarity to any candidate.
///
/// When no signed amount label exists but both an exact `debit` and an exact
/// `credit` column do, the mapping uses the split pair.
pub fn map_structured_columns(headers: &[String]) -> Option<ColumnMapping> {
    let keys: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let date = pick(&keys, DATE_CANDIDATES)?;
    let description = pick(&keys, DESCRIPTION_CANDIDATES)?;

    let amount = match (
        exact(&keys, SIGNED_AMOUNT_LABELS),
        exact(&keys, &["debit"]),
        exact(&keys, &["credit"]),
    ) {
        (Some(a), _, _) => AmountColumns::Single(a),
        (None, Some(debit), Some(credit)) => AmountColumns::Split {
            debit: Some(debit),
            credit: Some(credit),
        },
        _ => AmountColumns::Single(pick(&keys, AMOUNT_CANDIDATES)?),
    };

    debug!(date, description, ?amount, "structured columns");
    Some(ColumnMapping {
        date,
        description,
        amount,
    })
}

fn pick(keys: &[String], candidates: &[&str]) -> Option<usize> {
    exact(keys, candidates).or_else(|| closest(keys, candidates))
}

fn exact(keys: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|cand| keys.iter().position(|k| k == cand))
}

/// Highest-scoring column; ties keep the first column examined and a zero
/// score never wins.
fn closest(keys: &[String], candidates: &[&str]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_score = 0.0;
    for (i, key) in keys.iter().enumerate() {
        for cand in candidates {
            let score = partial_ratio(key, cand);
            if score > best_score {
                best_score = score;
                best = Some(i);
            }
        }
    }
    best
}
