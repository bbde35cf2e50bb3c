use chrono::NaiveDate;
use lettrage_core::{parse_amount, parse_date, re, InvoiceFields, DEFAULT_CURRENCY};
use rust_decimal::Decimal;

// ── Compiled patterns ────────────────────────────────────────────────────────

re!(re_number_facture,
    r"(?i)facture\s*(?:n[°o]|no|num(?:éro)?)\s*[:#-]?\s*([A-Za-z0-9\-_/]{3,})");
re!(re_number_invoice,
    r"(?i)invoice\s*(?:n[°o]|no|#)?\s*[:#-]?\s*([A-Za-z0-9\-_/]{3,})");
re!(re_number_bare,
    r"(?i)\b(?:facture|invoice)\s*[:#-]?\s*([A-Za-z0-9\-_/]{3,})");

re!(re_date_hint,
    r"(?i)date\s*(?:de\s*facture|facture|invoice)?\s*[:#-]?\s*([0-9]{1,2}[\-/.][0-9]{1,2}[\-/.][0-9]{2,4}|[0-9]{4}[\-/.][0-9]{1,2}[\-/.][0-9]{1,2}|\d{1,2}\s\w+\s\d{4})");
re!(re_date_token,
    r"(\d{1,2}[-/. ]\d{1,2}[-/. ]\d{2,4}|\d{4}[-/. ]\d{1,2}[-/. ]\d{1,2})");

// Amount tokens stay on one line: only horizontal whitespace is allowed
// inside them.
re!(re_total_ttc,
    r"(?i)total\s*(?:ttc)?\s*[:#-]?\s*([+-]?[ \t]*[0-9 \t\u{a0}\u{202f}.,]+)");
re!(re_total_montant,
    r"(?i)montant\s*(?:ttc|total)\s*[:#-]?\s*([+-]?[ \t]*[0-9 \t\u{a0}\u{202f}.,]+)");
re!(re_amount_token,
    r"[+-]?[ \t]*[0-9 \t\u{a0}\u{202f}.,]{2,}");

const CURRENCY_MARKERS: &[&str] = &["eur", "€", "eur.", "euro", "euros"];

// ── Public extraction API ────────────────────────────────────────────────────

pub struct Extractor;

impl Extractor {
    /// Recover invoice number, date, total and currency from one document's
    /// text. Every field is best effort; empty text yields no fields except
    /// the default currency.
    pub fn extract(text: &str) -> InvoiceFields {
        InvoiceFields {
            invoice_number: Self::extract_invoice_number(text),
            invoice_date: Self::extract_date(text),
            total_amount: Self::extract_total(text),
            currency: Some(Self::extract_currency(text).to_string()),
        }
    }

    // ── Invoice number ───────────────────────────────────────────────────────

    fn extract_invoice_number(text: &str) -> Option<String> {
        [re_number_facture(), re_number_invoice(), re_number_bare()]
            .into_iter()
            .find_map(|re| re.captures(text))
            .and_then(|c| c.get(1))
            .map(|m| {
                m.as_str()
                    .trim()
                    .trim_matches(|c: char| ":#-/ ".contains(c))
                    .to_string()
            })
            .filter(|n| !n.is_empty())
    }

    // ── Date ─────────────────────────────────────────────────────────────────

    fn extract_date(text: &str) -> Option<NaiveDate> {
        re_date_hint()
            .captures_iter(text)
            .find_map(|c| parse_date(c.get(1)?.as_str()))
            .or_else(|| {
                re_date_token()
                    .captures_iter(text)
                    .find_map(|c| parse_date(c.get(1)?.as_str()))
            })
    }

    // ── Amounts ──────────────────────────────────────────────────────────────

    fn extract_total(text: &str) -> Option<Decimal> {
        // A labelled total wins over any other figure on the page.
        for re in [re_total_ttc(), re_total_montant()] {
            let labelled = re
                .captures_iter(text)
                .find_map(|c| parse_amount(c.get(1)?.as_str()));
            if labelled.is_some() {
                return labelled;
            }
        }
        // Otherwise assume the largest figure is the total.
        re_amount_token()
            .find_iter(text)
            .filter_map(|m| parse_amount(m.as_str()))
            .max()
    }

    // ── Currency ─────────────────────────────────────────────────────────────

    fn extract_currency(text: &str) -> &'static str {
        let lower = text.to_lowercase();
        if CURRENCY_MARKERS.iter().any(|m| lower.contains(m)) {
            "EUR"
        } else {
            DEFAULT_CURRENCY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const FRENCH_INVOICE: &str = "SARL DUPONT\n\
        Facture N° F-2024-001\n\
        Date de facture : 10/01/2024\n\
        Désignation   Qté   Prix\n\
        Prestation     1   100,00\n\
        Total HT 100,00\n\
        TVA 20% 20,00\n\
        Total TTC : 120,00 €\n";

    // ── Invoice number ───────────────────────────────────────────────────────

    #[test]
    fn invoice_number_french_keeps_casing() {
        let r = Extractor::extract(FRENCH_INVOICE);
        assert_eq!(r.invoice_number.as_deref(), Some("F-2024-001"));
    }

    #[test]
    fn invoice_number_english_hash() {
        let r = Extractor::extract("ACME Ltd\nInvoice #INV-042\nTotal: 150.00 EUR");
        assert_eq!(r.invoice_number.as_deref(), Some("INV-042"));
    }

    #[test]
    fn invoice_number_numero_spelled_out() {
        let r = Extractor::extract("FACTURE NUMÉRO: 2024/117");
        assert_eq!(r.invoice_number.as_deref(), Some("2024/117"));
    }

    #[test]
    fn invoice_number_bare_label() {
        let r = Extractor::extract("Facture: AB12");
        assert_eq!(r.invoice_number.as_deref(), Some("AB12"));
    }

    #[test]
    fn invoice_number_trims_trailing_separators() {
        let r = Extractor::extract("Invoice no: X-99/");
        assert_eq!(r.invoice_number.as_deref(), Some("X-99"));
    }

    // ── Date ─────────────────────────────────────────────────────────────────

    #[test]
    fn date_from_hint() {
        let r = Extractor::extract(FRENCH_INVOICE);
        assert_eq!(r.invoice_date, Some(ymd(2024, 1, 10)));
    }

    #[test]
    fn date_hint_with_month_name() {
        let r = Extractor::extract("Invoice date: 5 March 2024\nDue 2024-04-05");
        assert_eq!(r.invoice_date, Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn date_falls_back_to_first_token() {
        let r = Extractor::extract("Paris, le 03.02.2024\nÉchéance 2024-03-03");
        assert_eq!(r.invoice_date, Some(ymd(2024, 2, 3)));
    }

    #[test]
    fn date_absent() {
        assert_eq!(Extractor::extract("no date here").invoice_date, None);
    }

    // ── Total ────────────────────────────────────────────────────────────────

    #[test]
    fn total_skips_label_without_figure() {
        // "Total HT 100,00" has no figure right after the label pattern, so
        // the TTC line is the first labelled total that parses.
        let r = Extractor::extract(FRENCH_INVOICE);
        assert_eq!(r.total_amount, Some(dec("120.00")));
    }

    #[test]
    fn total_first_parsable_label_wins() {
        let r = Extractor::extract("Total : 80,00\nTotal TTC : 96,00");
        assert_eq!(r.total_amount, Some(dec("80.00")));
    }

    #[test]
    fn total_ttc_with_grouped_thousands() {
        let r = Extractor::extract("Total TTC: 1 234,56 €");
        assert_eq!(r.total_amount, Some(dec("1234.56")));
    }

    #[test]
    fn total_montant_ttc() {
        let r = Extractor::extract("Montant TTC 89,90");
        assert_eq!(r.total_amount, Some(dec("89.90")));
    }

    #[test]
    fn total_does_not_span_lines() {
        let r = Extractor::extract("Total TTC 120,00\n2024");
        assert_eq!(r.total_amount, Some(dec("120.00")));
    }

    #[test]
    fn total_falls_back_to_largest_figure() {
        let r = Extractor::extract("Article A 12,50\nArticle B 30,00\nArticle C 7,25");
        assert_eq!(r.total_amount, Some(dec("30.00")));
    }

    #[test]
    fn total_absent_on_empty_text() {
        let r = Extractor::extract("");
        assert_eq!(r.total_amount, None);
        assert_eq!(r.invoice_number, None);
        assert_eq!(r.invoice_date, None);
        assert_eq!(r.currency.as_deref(), Some("EUR"));
    }

    // ── Currency ─────────────────────────────────────────────────────────────

    #[test]
    fn currency_defaults_to_eur() {
        assert_eq!(Extractor::extract("Total 10,00 €").currency.as_deref(), Some("EUR"));
        assert_eq!(Extractor::extract("Total 10.00 USD").currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = Extractor::extract("!@#$%^&*()\n\0\x01\x02 ,,, ...");
    }

    #[test]
    fn oversized_figure_is_skipped() {
        let r = Extractor::extract("Ref 79228162514264337593543950335.99\nArticle 12,50");
        assert_eq!(r.total_amount, Some(dec("12.50")));
    }
}
