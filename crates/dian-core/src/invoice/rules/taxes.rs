//! Tax totals extraction from the "Datos Totales" section.

use rust_decimal::Decimal;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::models::invoice::{TaxKind, TaxTotals};

use super::numbers::parse_amount;
use super::patterns::tax_patterns;
use super::FieldExtractor;

/// Raw amount text of one tax kind.
pub struct TaxAmountExtractor {
    kind: TaxKind,
}

impl TaxAmountExtractor {
    pub fn new(kind: TaxKind) -> Self {
        Self { kind }
    }
}

impl FieldExtractor for TaxAmountExtractor {
    type Output = String;

    /// First match of the first pattern that matches at all.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        tax_patterns(self.kind)
            .iter()
            .flat_map(|pattern| pattern.captures_iter(text))
            .map(|caps| caps[1].trim().to_string())
            .collect()
    }
}

/// Extract the nine tax totals from the section opened by `section_header`.
///
/// Without the header every kind stays at zero. Each kind keeps the first
/// match of its first matching pattern.
pub fn extract_tax_totals(
    text: &str,
    section_header: &str,
    diagnostics: &mut Diagnostics,
) -> TaxTotals {
    let mut totals = TaxTotals::default();

    let Some(start) = text.find(section_header) else {
        diagnostics.info(
            "extract_tax_totals",
            format!("section {:?} not found, tax totals default to zero", section_header),
        );
        return totals;
    };
    let section = &text[start..];

    for kind in TaxKind::ALL {
        let Some(raw) = TaxAmountExtractor::new(kind).extract(section) else {
            continue;
        };
        let value = parse_amount(&raw, diagnostics);
        debug!("{} = {} ({:?})", kind.label(), value, raw);
        totals.set(kind, value);
    }

    totals
}
