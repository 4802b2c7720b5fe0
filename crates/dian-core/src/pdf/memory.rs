//! In-memory document built from already extracted page content.

use serde::{Deserialize, Serialize};

use super::{PdfProcessor, Result, Table};
use crate::error::PdfError;

/// A page given directly as text plus tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl MemoryPage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }
}

/// Document whose pages were extracted elsewhere, e.g. a JSON page dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<MemoryPage>) -> Self {
        Self { pages }
    }

    /// Load a JSON dump of the form `{"pages": [{"text": ..., "tables": [...]}]}`.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let doc: Self =
            serde_json::from_slice(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        if doc.pages.is_empty() {
            return Err(PdfError::NoPages);
        }
        Ok(doc)
    }

    fn page(&self, page: u32) -> Result<&MemoryPage> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .ok_or(PdfError::InvalidPage(page))
    }
}

impl PdfProcessor for MemoryDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        Ok(self.page(page)?.text.clone())
    }

    fn extract_page_tables(&self, page: u32) -> Result<Vec<Table>> {
        Ok(self.page(page)?.tables.clone())
    }
}
