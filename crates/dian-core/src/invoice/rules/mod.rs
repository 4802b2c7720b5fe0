//! Rule-based field extractors for DIAN invoices.

pub mod fields;
pub mod numbers;
pub mod patterns;
pub mod taxes;
pub mod vat;

pub use fields::{extract_field, MarkerPair};
pub use numbers::{parse_amount, try_parse_amount, try_parse_percent};
pub use taxes::extract_tax_totals;
pub use vat::{vat_indicator, vat_rate_from_cell};

use crate::error::ExtractionError;

/// Result type for rule-level parsing.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
