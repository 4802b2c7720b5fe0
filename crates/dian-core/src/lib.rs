//! Core library for DIAN electronic invoice extraction.
//!
//! This crate provides:
//! - PDF access (page text and reconstructed item tables)
//! - Header fields, tax totals and VAT-bucket aggregation per document kind
//! - The 24-column accounting rows and per-batch result collection

pub mod diagnostics;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{DianError, Result};
pub use invoice::{FileOutcome, Pipeline, PipelineOutput};
pub use models::collection::{Bucket, FailureRecord, ResultCollection};
pub use models::config::DianConfig;
pub use models::invoice::{
    DocumentKind, HeaderFields, InventoryItem, OutputRow, TaxKind, TaxTotals, VatRate,
};
pub use pdf::{open_document, MemoryDocument, PdfExtractor, PdfProcessor};
