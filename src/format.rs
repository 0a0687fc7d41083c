//! # Value Formatting
//!
//! Every string the layout engine prints for a value goes through this
//! module. Currency in particular has exactly one formatter, used for row
//! amounts, company totals and the grand total alike.
//!
//! Formatting is fail-soft: a value that cannot be interpreted is printed
//! as it was given, never rejected.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Locale rules for rendering money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: char,
    pub decimal_separator: char,
    pub decimals: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}

impl CurrencyFormat {
    /// Brazilian real, pt-BR grouping: `R$ 1.234,56`.
    pub fn brl() -> Self {
        Self {
            symbol: "R$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            decimals: 2,
        }
    }

    /// Format an amount with symbol, grouping and fixed decimals.
    ///
    /// Rounds half away from zero. Negative amounts put the sign before the
    /// symbol (`-R$ 1,00`).
    pub fn format(&self, amount: Decimal) -> String {
        let mut value = amount
            .round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero)
            .abs();
        value.rescale(self.decimals);
        let negative = amount.is_sign_negative() && !value.is_zero();

        let plain = value.to_string();
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (plain.as_str(), None),
        };

        let mut out = String::with_capacity(plain.len() + self.symbol.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&self.symbol);
        if !self.symbol.is_empty() {
            out.push(' ');
        }
        out.push_str(&group_thousands(int_part, self.thousands_separator));
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

/// Parse the date formats report data arrives in.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Render a date as `DD/MM/YYYY`, or return the input unchanged when it
/// does not parse.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => {
            if !raw.trim().is_empty() {
                log::warn!("unparseable date {raw:?}, printing verbatim");
            }
            raw.to_string()
        }
    }
}

/// Render the generation stamp as `DD/MM/YYYY HH:MM`.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Format a CNPJ. Fourteen digits become `##.###.###/####-##`; any other
/// digit count is returned unchanged.
pub fn format_tax_id(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 14 {
        return raw.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

/// Cut `text` to at most `max_chars` characters, ending in [`ELLIPSIS`]
/// when anything was removed.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }
    let marker = ELLIPSIS.chars().count();
    if max_chars <= marker {
        return Cow::Owned(text.chars().take(max_chars).collect());
    }
    let mut out: String = text.chars().take(max_chars - marker).collect();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brl(units: i64, scale: u32) -> String {
        CurrencyFormat::brl().format(Decimal::new(units, scale))
    }

    #[test]
    fn currency_basic() {
        assert_eq!(brl(35000, 2), "R$ 350,00");
        assert_eq!(brl(0, 0), "R$ 0,00");
        assert_eq!(brl(5, 1), "R$ 0,50");
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(brl(123456789, 2), "R$ 1.234.567,89");
        assert_eq!(brl(100000, 2), "R$ 1.000,00");
        assert_eq!(brl(99999, 2), "R$ 999,99");
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(brl(12345, 3), "R$ 12,35");
        assert_eq!(brl(-12345, 3), "-R$ 12,35");
        assert_eq!(brl(99995, 4), "R$ 10,00");
    }

    #[test]
    fn currency_negative_zero_has_no_sign() {
        assert_eq!(brl(-1, 3), "R$ 0,00");
    }

    #[test]
    fn currency_other_locale() {
        let usd = CurrencyFormat {
            symbol: "$".to_string(),
            thousands_separator: ',',
            decimal_separator: '.',
            decimals: 2,
        };
        assert_eq!(usd.format(Decimal::new(123456, 2)), "$ 1,234.56");
    }

    #[test]
    fn date_iso() {
        assert_eq!(format_date("2024-03-07"), "07/03/2024");
    }

    #[test]
    fn date_with_time() {
        assert_eq!(format_date("2024-03-07T15:04:05Z"), "07/03/2024");
        assert_eq!(format_date("2024-03-07T15:04:05.123"), "07/03/2024");
        assert_eq!(format_date("2024-03-07 15:04:05"), "07/03/2024");
    }

    #[test]
    fn date_already_brazilian() {
        assert_eq!(format_date("07/03/2024"), "07/03/2024");
    }

    #[test]
    fn date_unparseable_is_verbatim() {
        assert_eq!(format_date("ontem"), "ontem");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("2024-13-45"), "2024-13-45");
    }

    #[test]
    fn timestamp_format() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(format_timestamp(&at), "18/10/2026 09:05");
    }

    #[test]
    fn tax_id_fourteen_digits() {
        assert_eq!(format_tax_id("12345678000190"), "12.345.678/0001-90");
    }

    #[test]
    fn tax_id_already_formatted() {
        assert_eq!(format_tax_id("12.345.678/0001-90"), "12.345.678/0001-90");
    }

    #[test]
    fn tax_id_other_lengths_pass_through() {
        assert_eq!(format_tax_id("12345678901"), "12345678901");
        assert_eq!(format_tax_id("123"), "123");
        assert_eq!(format_tax_id(""), "");
        assert_eq!(format_tax_id("123456780001901"), "123456780001901");
    }

    #[test]
    fn tax_id_pattern_shape() {
        let out = format_tax_id("00111222000133");
        let shape: String = out
            .chars()
            .map(|c| if c.is_ascii_digit() { 'd' } else { c })
            .collect();
        assert_eq!(shape, "dd.ddd.ddd/dddd-dd");
    }

    #[test]
    fn truncate_short_text_untouched() {
        assert!(matches!(truncate("abc", 35), Cow::Borrowed("abc")));
        let exact = "x".repeat(35);
        assert_eq!(truncate(&exact, 35), exact);
    }

    #[test]
    fn truncate_long_text_hits_threshold() {
        for threshold in [35usize, 45] {
            let long = "N".repeat(threshold + 10);
            let out = truncate(&long, threshold);
            assert_eq!(out.chars().count(), threshold);
            assert!(out.ends_with(ELLIPSIS));
            assert_eq!(&out[..threshold - 3], &long[..threshold - 3]);
        }
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let name = "Comércio de Alimentação São João Ltda ME";
        let out = truncate(name, 20);
        assert_eq!(out.chars().count(), 20);
        assert_eq!(out, "Comércio de Alime...");
    }

    #[test]
    fn truncate_tiny_threshold() {
        assert_eq!(truncate("abcdef", 2), "ab");
    }
}
