//! PDF text and table extraction using lopdf and pdf-extract.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::table::reconstruct_tables;
use super::{PdfProcessor, Result, Table};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_pages: u32,
    decrypt_empty_password: bool,
    page_text: RefCell<BTreeMap<u32, String>>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
            decrypt_empty_password: true,
            page_text: RefCell::new(BTreeMap::new()),
        }
    }

    /// Limit the number of pages read (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Try an empty password on encrypted documents.
    pub fn with_empty_password_decryption(mut self, enabled: bool) -> Self {
        self.decrypt_empty_password = enabled;
        self
    }

    /// Read and load a PDF file.
    pub fn open(mut self, path: &Path) -> crate::Result<Self> {
        let data = std::fs::read(path)?;
        self.load(&data)?;
        Ok(self)
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if !self.decrypt_empty_password || doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.page_text.borrow_mut().clear();
        Ok(())
    }

    fn read_page_text(&self, doc: &Document, page: u32) -> Result<String> {
        match doc.extract_text(&[page]) {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => trace!("lopdf returned no text for page {}", page),
            Err(e) => warn!("lopdf text extraction failed on page {}: {}", page, e),
        }

        // pdf-extract handles more font encodings but only yields whole-document text
        if self.page_count() == 1 {
            debug!("Falling back to pdf-extract for single-page document");
            return pdf_extract::extract_text_from_mem(&self.raw_data)
                .map_err(|e| PdfError::TextExtraction(e.to_string()));
        }

        Ok(String::new())
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn page_count(&self) -> u32 {
        let pages = self
            .document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0);

        if self.max_pages > 0 {
            pages.min(self.max_pages)
        } else {
            pages
        }
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        if let Some(text) = self.page_text.borrow().get(&page) {
            return Ok(text.clone());
        }

        let text = self.read_page_text(doc, page)?;
        trace!("Page {} has {} chars of text", page, text.len());
        self.page_text.borrow_mut().insert(page, text.clone());
        Ok(text)
    }

    fn extract_page_tables(&self, page: u32) -> Result<Vec<Table>> {
        let text = self.extract_page_text(page)?;
        let tables = reconstruct_tables(&text);
        debug!("Reconstructed {} tables on page {}", tables.len(), page);
        Ok(tables)
    }
}
