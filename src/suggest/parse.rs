//! Parsing of the model's `FINAL SUGGESTION: $<amount>` marker.
//!
//! This is the parseable contract between free text and a number: the reply
//! is expected to end with a line of the exact form `FINAL SUGGESTION:
//! $1,234.56` (thousands separators and cents optional). No match is a
//! recoverable condition, never a parse panic.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static FINAL_SUGGESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FINAL\s+SUGGESTION:\s*\$\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)")
        .expect("final suggestion regex is valid")
});

/// Extract the suggested amount from a model reply.
///
/// Takes the last marker in the text (models occasionally restate it),
/// strips the currency symbol and thousands separators, and parses the rest
/// as a decimal. Returns None when the marker is absent or malformed.
pub fn parse_final_amount(text: &str) -> Option<Decimal> {
    let captures = FINAL_SUGGESTION.captures_iter(text).last()?;
    let raw = captures.get(1)?.as_str().replace(',', "");
    Decimal::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_amount_with_separators_and_cents() {
        let text = "…analysis… FINAL SUGGESTION: $1,234.56";
        assert_eq!(parse_final_amount(text), Some(dec!(1234.56)));
    }

    #[test]
    fn parses_plain_amount() {
        assert_eq!(parse_final_amount("FINAL SUGGESTION: $25"), Some(dec!(25)));
        assert_eq!(
            parse_final_amount("FINAL SUGGESTION: $ 19.99"),
            Some(dec!(19.99))
        );
    }

    #[test]
    fn takes_the_last_marker() {
        let text = "FINAL SUGGESTION: $10.00 — wait, on reflection:\nFINAL SUGGESTION: $12.50";
        assert_eq!(parse_final_amount(text), Some(dec!(12.50)));
    }

    #[test]
    fn marker_is_case_insensitive() {
        assert_eq!(
            parse_final_amount("final suggestion: $3,000"),
            Some(dec!(3000))
        );
    }

    #[test]
    fn missing_marker_returns_none() {
        assert_eq!(parse_final_amount("I think around twenty dollars."), None);
        assert_eq!(parse_final_amount(""), None);
    }

    #[test]
    fn marker_without_dollar_sign_returns_none() {
        assert_eq!(parse_final_amount("FINAL SUGGESTION: 20.00"), None);
    }

    #[test]
    fn large_amount_with_multiple_groups() {
        assert_eq!(
            parse_final_amount("FINAL SUGGESTION: $12,345,678.90"),
            Some(dec!(12345678.90))
        );
    }
}
