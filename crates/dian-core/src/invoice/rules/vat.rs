//! VAT rate classification into accounting indicator codes.

use rust_decimal::Decimal;

use crate::models::invoice::VatRate;

use super::numbers::try_parse_percent;
use super::patterns::SPECIAL_TAX_LABELS;
use super::Result;

/// Rate to indicator code. 4, 8 and 16 share the INC / special-regime code.
const INDICATORS: [(i64, &str); 6] = [
    (19, "001"),
    (5, "002"),
    (0, "003"),
    (4, "004"),
    (8, "004"),
    (16, "004"),
];

/// Indicator code of a numeric VAT percentage; empty when unmapped.
pub fn indicator_for_percent(percent: Decimal) -> &'static str {
    INDICATORS
        .iter()
        .find(|(rate, _)| Decimal::from(*rate) == percent)
        .map(|(_, code)| *code)
        .unwrap_or("")
}

fn is_special_label(text: &str) -> bool {
    let upper = text.to_uppercase();
    SPECIAL_TAX_LABELS.iter().any(|label| upper.contains(label))
}

/// Indicator column value for a bucket key.
///
/// Special-tax labels pass through verbatim; anything else unmapped is empty.
pub fn vat_indicator(rate: &VatRate) -> String {
    match rate {
        VatRate::Percent(p) => indicator_for_percent(*p).to_string(),
        VatRate::Label(label) if is_special_label(label) => label.clone(),
        VatRate::Label(_) => String::new(),
    }
}

/// Read the VAT-percent cell of an item row.
///
/// Non-numeric cells naming a special tax become [`VatRate::Label`];
/// other non-numeric cells are an error.
pub fn vat_rate_from_cell(cell: &str) -> Result<VatRate> {
    match try_parse_percent(cell) {
        Ok(percent) => Ok(VatRate::Percent(percent)),
        Err(_) if is_special_label(cell) => Ok(VatRate::Label(cell.trim().to_string())),
        Err(e) => Err(e),
    }
}
