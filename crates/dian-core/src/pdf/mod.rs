//! PDF access: page text and line-item tables.

mod extractor;
mod memory;
pub mod table;

pub use extractor::PdfExtractor;
pub use memory::{MemoryDocument, MemoryPage};

use std::path::Path;

use tracing::debug;

use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// One table row; cells may be empty.
pub type Row = Vec<Option<String>>;

/// One extracted table.
pub type Table = Vec<Row>;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Content of a single page.
#[derive(Debug, Clone, Default)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Plain text of the page.
    pub text: String,
    /// Tables found on the page.
    pub tables: Vec<Table>,
}

/// Read access to a loaded document, page by page.
pub trait PdfProcessor {
    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract tables from a specific page (1-indexed).
    fn extract_page_tables(&self, page: u32) -> Result<Vec<Table>>;

    /// Extract text from the entire document, pages joined by a blank line.
    fn extract_text(&self) -> Result<String> {
        let mut full_text = String::new();
        for page in 1..=self.page_count() {
            let text = self.extract_page_text(page)?;
            if text.is_empty() {
                continue;
            }
            if !full_text.is_empty() {
                full_text.push_str("\n\n");
            }
            full_text.push_str(&text);
        }
        Ok(full_text)
    }

    /// Extract text and tables of every page.
    fn pages(&self) -> Result<Vec<PdfPage>> {
        (1..=self.page_count())
            .map(|number| {
                Ok(PdfPage {
                    number,
                    text: self.extract_page_text(number)?,
                    tables: self.extract_page_tables(number)?,
                })
            })
            .collect()
    }
}

/// Normalize a row: missing cells become empty strings, all cells trimmed.
pub fn clean_row(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|cell| cell.as_deref().unwrap_or("").trim().to_string())
        .collect()
}

/// Open a document for extraction.
///
/// `.json` files are read as page dumps ([`MemoryDocument`]); anything else
/// is loaded as a PDF.
pub fn open_document(path: &Path, config: &PdfConfig) -> crate::Result<Box<dyn PdfProcessor>> {
    let is_dump = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_dump {
        debug!("Reading page dump {}", path.display());
        let data = std::fs::read(path)?;
        return Ok(Box::new(MemoryDocument::from_json(&data)?));
    }

    let extractor = PdfExtractor::new()
        .with_max_pages(config.max_pages)
        .with_empty_password_decryption(config.decrypt_empty_password)
        .open(path)?;
    Ok(Box::new(extractor))
}
