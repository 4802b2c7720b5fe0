//! Marker-delimited field extraction.

use super::FieldExtractor;

/// A field printed between two fixed labels, e.g. `Nit del Emisor:` .. `País:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPair {
    pub start: &'static str,
    pub end: &'static str,
}

impl MarkerPair {
    pub const fn new(start: &'static str, end: &'static str) -> Self {
        Self { start, end }
    }

    /// Value following the start marker found at `from`, and where the scan
    /// for the next occurrence should resume.
    fn value_at<'a>(&self, text: &'a str, from: usize) -> Option<(&'a str, usize)> {
        let start = from + text[from..].find(self.start)? + self.start.len();
        match text[start..].find(self.end) {
            Some(offset) => Some((text[start..start + offset].trim(), start + offset)),
            None => Some((text[start..].trim(), text.len())),
        }
    }
}

impl FieldExtractor for MarkerPair {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        let mut from = 0;

        while from < text.len() {
            let Some((value, next)) = self.value_at(text, from) else {
                break;
            };
            results.push(value.to_string());
            from = next;
        }

        results
    }
}

/// Text strictly between the first `start` marker and the first `end`
/// marker after it, trimmed.
///
/// A missing start marker yields an empty string; a missing end marker
/// yields everything after the start marker.
pub fn extract_field(text: &str, start: &'static str, end: &'static str) -> String {
    MarkerPair::new(start, end).extract(text).unwrap_or_default()
}
