//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DianError, Result};
use crate::invoice::items::COL_VAT_PERCENT;

/// Main configuration for the dian pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DianConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read per document (0 = unlimited).
    pub max_pages: u32,

    /// Try an empty password on encrypted PDFs.
    pub decrypt_empty_password: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            decrypt_empty_password: true,
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum cells for a row to count as a line item.
    pub min_item_cells: usize,

    /// Minimum cells for a row to count as an inventory item.
    pub min_inventory_cells: usize,

    /// Header that opens the totals section.
    pub totals_section_header: String,

    /// Indicator code written on synthetic discount rows.
    pub discount_indicator: String,

    /// Run the inventory extractor alongside purchase invoices.
    pub extract_inventory: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_item_cells: 10,
            min_inventory_cells: 11,
            totals_section_header: "Datos Totales".to_string(),
            discount_indicator: "42104001".to_string(),
            extract_inventory: true,
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field delimiter for CSV output.
    pub delimiter: char,

    /// Write a file for buckets that received no rows.
    pub write_empty_buckets: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            write_empty_buckets: false,
        }
    }
}

impl DianConfig {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| DianError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| DianError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the extractors cannot work with.
    pub fn validate(&self) -> Result<()> {
        // Item rows are read up to the VAT percent column
        if self.extraction.min_item_cells <= COL_VAT_PERCENT {
            return Err(DianError::Config(format!(
                "extraction.min_item_cells must be at least {}, got {}",
                COL_VAT_PERCENT + 1,
                self.extraction.min_item_cells
            )));
        }
        if !self.export.delimiter.is_ascii() {
            return Err(DianError::Config(format!(
                "export.delimiter must be an ASCII character, got {:?}",
                self.export.delimiter
            )));
        }
        Ok(())
    }
}
