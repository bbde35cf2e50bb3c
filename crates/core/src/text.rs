/// Lower-case `s` and strip the French/Latin accents found in bank exports.
pub fn fold_accents(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'û' | 'ù' | 'ü' => 'u',
            'à' | 'â' | 'ä' | 'á' => 'a',
            'ô' | 'ö' | 'ó' => 'o',
            'î' | 'ï' | 'í' => 'i',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Accent-folded, lower-cased label with every run of non-alphanumerics
/// collapsed to a single space.
pub fn normalize_label(s: &str) -> String {
    fold_accents(s)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_accents() {
        assert_eq!(fold_accents("Libellé Opération"), "libelle operation");
        assert_eq!(fold_accents("DÉBIT"), "debit");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(normalize_label("  Date d'opération  "), "date d operation");
        assert_eq!(normalize_label("Débit / Crédit (€)"), "debit credit");
        assert_eq!(normalize_label("---"), "");
    }
}
