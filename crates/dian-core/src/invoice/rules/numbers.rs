//! Colombian number normalization (`$ 1.234.567,89`, `19,00`, `45.000`).

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::diagnostics::Diagnostics;
use crate::error::ExtractionError;

use super::Result;

/// Parse a Colombian-formatted amount.
///
/// `$` and whitespace are dropped. With dots but no comma, every dot is a
/// thousands separator. Otherwise the first comma splits the integer part
/// (dots stripped) from at most two fractional digits. Empty input is zero.
pub fn try_parse_amount(text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let number = if cleaned.contains('.') && !cleaned.contains(',') {
        cleaned.replace('.', "")
    } else if let Some((integer, fraction)) = cleaned.split_once(',') {
        let mut integer = integer.replace('.', "");
        if integer.is_empty() || integer == "-" {
            integer.push('0');
        }
        let fraction: String = fraction.chars().take(2).collect();
        if fraction.is_empty() {
            integer
        } else {
            format!("{}.{}", integer, fraction)
        }
    } else {
        cleaned
    };

    to_decimal(&number).ok_or_else(|| ExtractionError::malformed("amount", text))
}

/// Lenient variant of [`try_parse_amount`]: malformed input is reported to
/// the diagnostics sink and read as zero.
pub fn parse_amount(text: &str, diagnostics: &mut Diagnostics) -> Decimal {
    match try_parse_amount(text) {
        Ok(value) => value,
        Err(e) => {
            diagnostics.warn("parse_amount", e.to_string());
            Decimal::ZERO
        }
    }
}

/// Parse a percentage cell (`19,00`, `19%`, `5.0`). Empty input is zero.
pub fn try_parse_percent(text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    to_decimal(&cleaned).ok_or_else(|| ExtractionError::malformed("percent", text))
}

fn to_decimal(number: &str) -> Option<Decimal> {
    // Decimal::from_str accepts `_` separators; only plain digits are valid here
    let digits = number.strip_prefix('-').unwrap_or(number);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    Decimal::from_str(number).ok()
}
