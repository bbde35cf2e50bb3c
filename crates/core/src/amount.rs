use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

// Sign, integer part (grouped by `.`/`,` every three digits, or a bare digit
// run), then an optional two-digit fraction.
re!(re_amount, r"([+-]?)\s*(\d{1,3}(?:[.,]\d{3})+|\d+)(?:[.,](\d{2}))?");

/// Parse a French- or English-formatted amount such as `"1 234,56"`,
/// `"1.234,56"` or `"-1,234.56"`.
///
/// Any `.`/`,` inside the integer part is a thousands separator; only a
/// trailing two-digit group is taken as the fraction. `"1,234"` therefore
/// reads as 1234 and never as 1.234.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let spaced = text.replace(['\u{202f}', '\u{a0}'], " ");
    let cleaned = collapse_digit_gaps(spaced.trim());

    let c = re_amount().captures(&cleaned)?;
    let digits: String = c.get(2)?.as_str().chars().filter(char::is_ascii_digit).collect();
    let mut value = Decimal::from_str(&digits).ok()?;
    if let Some(frac) = c.get(3) {
        let frac = Decimal::from_str(frac.as_str()).ok()?.checked_div(Decimal::ONE_HUNDRED)?;
        value = value.checked_add(frac)?;
    }
    if c.get(1).is_some_and(|s| s.as_str() == "-") {
        value = -value;
    }
    Some(value)
}

/// Convert a spreadsheet/CSV float cell into a decimal.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Render an amount with exactly two decimal places.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Drop whitespace that sits between two digits (`"1 234"` -> `"1234"`).
fn collapse_digit_gaps(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() && out.ends_with(|p: char| p.is_ascii_digit()) {
            let mut j = i;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && chars[j].is_ascii_digit() {
                i = j;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}
