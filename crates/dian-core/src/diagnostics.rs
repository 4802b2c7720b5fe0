//! Diagnostics sink threaded through every extraction stage.
//!
//! Each pipeline call receives a `&mut Diagnostics`. Entries are mirrored to
//! `tracing` as they are recorded, so a caller that only installs a
//! subscriber still sees them, while batch callers can read them back to
//! build per-file error records.

use serde::Serialize;
use tracing::{debug, error, warn};

/// How serious a recorded entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, e.g. a section that was absent.
    Info,
    /// A value or row was degraded or skipped.
    Warning,
    /// The whole document was rejected.
    Fatal,
}

/// One recorded entry.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Operation that produced the entry (e.g. `"parse_amount"`).
    pub operation: &'static str,
    pub message: String,
}

/// Collects diagnostics for a single document.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, operation: &'static str, message: impl Into<String>) {
        let message = message.into();
        debug!(operation, "{}", message);
        self.push(Severity::Info, operation, message);
    }

    pub fn warn(&mut self, operation: &'static str, message: impl Into<String>) {
        let message = message.into();
        warn!(operation, "{}", message);
        self.push(Severity::Warning, operation, message);
    }

    pub fn fatal(&mut self, operation: &'static str, message: impl Into<String>) {
        let message = message.into();
        error!(operation, "{}", message);
        self.push(Severity::Fatal, operation, message);
    }

    fn push(&mut self, severity: Severity, operation: &'static str, message: String) {
        self.entries.push(Diagnostic {
            severity,
            operation,
            message,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Entries at warning level or above.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
    }

    /// The most recent fatal entry, if the document was rejected.
    pub fn last_fatal(&self) -> Option<&Diagnostic> {
        self.entries
            .iter()
            .rev()
            .find(|d| d.severity == Severity::Fatal)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_fatal() {
        let mut diag = Diagnostics::new();
        diag.warn("parse_amount", "bad value");
        assert!(diag.last_fatal().is_none());

        diag.fatal("open", "unreadable");
        assert_eq!(diag.last_fatal().unwrap().message, "unreadable");
        assert_eq!(diag.warnings().count(), 2);
    }

    #[test]
    fn test_info_not_counted_as_warning() {
        let mut diag = Diagnostics::new();
        diag.info("tax_totals", "section missing");
        assert_eq!(diag.entries().len(), 1);
        assert_eq!(diag.warnings().count(), 0);
    }
}
