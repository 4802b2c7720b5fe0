//! Error types for the dian-core library.

use thiserror::Error;

/// Main error type for the dian library.
#[derive(Error, Debug)]
pub enum DianError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A numeric cell or token could not be parsed.
    #[error("failed to parse {field}: {value:?}")]
    MalformedNumber { field: String, value: String },

    /// A table row is shorter than the column being read.
    #[error("row has {len} cells, column {column} is missing")]
    MissingColumn { column: usize, len: usize },

    /// A running total exceeded the range of `Decimal`.
    #[error("{field} total overflows")]
    Overflow { field: &'static str },

    /// The first page yielded no text.
    #[error("first page has no extractable text")]
    EmptyFirstPage,

    /// The document matched none of the known document phrases.
    #[error("document type not recognized")]
    UnrecognizedDocument,
}

impl ExtractionError {
    pub(crate) fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedNumber {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for the dian library.
pub type Result<T> = std::result::Result<T, DianError>;
