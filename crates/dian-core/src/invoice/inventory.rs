//! Per-item inventory extraction from purchase invoices.

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::error::ExtractionError;
use crate::models::invoice::InventoryItem;
use crate::pdf::{clean_row, PdfProcessor};

use super::items::*;
use super::rules::patterns::{INVOICE_NUMBER, ISSUER_TAX_ID};
use super::rules::{parse_amount, try_parse_percent, FieldExtractor, Result};

/// Extracts every item row as an [`InventoryItem`], without aggregation.
pub struct InventoryExtractor {
    min_cells: usize,
}

impl InventoryExtractor {
    pub fn new() -> Self {
        Self { min_cells: 11 }
    }

    /// Set the minimum number of cells of an inventory row.
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// Read all item rows, tagged with the issuer tax id and invoice number
    /// of the first page. Rows with missing columns or malformed
    /// percentages are skipped with a warning.
    pub fn extract(
        &self,
        doc: &dyn PdfProcessor,
        diagnostics: &mut Diagnostics,
    ) -> crate::Result<Vec<InventoryItem>> {
        if doc.page_count() == 0 {
            return Err(crate::error::PdfError::NoPages.into());
        }

        let first_page = doc.extract_page_text(1)?;
        if first_page.trim().is_empty() {
            return Err(ExtractionError::EmptyFirstPage.into());
        }
        let issuer_tax_id = ISSUER_TAX_ID.extract(&first_page).unwrap_or_default();
        let invoice_number = INVOICE_NUMBER.extract(&first_page).unwrap_or_default();

        let mut items = Vec::new();
        for page in doc.pages()? {
            for table in &page.tables {
                for raw in table {
                    let cells = clean_row(raw);
                    if !is_item_row(&cells, self.min_cells) {
                        continue;
                    }

                    match read_item(&cells, diagnostics) {
                        Ok(mut item) => {
                            item.issuer_tax_id = issuer_tax_id.clone();
                            item.invoice_number = invoice_number.clone();
                            items.push(item);
                        }
                        Err(e) => diagnostics.warn(
                            "extract_inventory",
                            format!(
                                "skipping inventory row {} on page {}: {}",
                                cells[COL_SEQUENCE], page.number, e
                            ),
                        ),
                    }
                }
            }
        }

        debug!("Extracted {} inventory items", items.len());
        Ok(items)
    }
}

impl Default for InventoryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn read_item(cells: &[String], diagnostics: &mut Diagnostics) -> Result<InventoryItem> {
    // Check the whole width before any lenient parse reports a warning
    cell(cells, COL_SALE_PRICE)?;

    let mut amount = |column: usize| -> Result<_> {
        Ok(parse_amount(cell(cells, column)?, diagnostics))
    };

    Ok(InventoryItem {
        issuer_tax_id: String::new(),
        invoice_number: String::new(),
        sequence: cell(cells, COL_SEQUENCE)?.to_string(),
        code: cell(cells, COL_CODE)?.to_string(),
        description: cell(cells, COL_DESCRIPTION)?.to_string(),
        unit: cell(cells, COL_UNIT)?.to_string(),
        quantity: amount(COL_QUANTITY)?,
        unit_price: amount(COL_UNIT_PRICE)?,
        discount: amount(COL_DISCOUNT)?,
        surcharge: amount(COL_SURCHARGE)?,
        vat_amount: amount(COL_VAT_AMOUNT)?,
        vat_percent: try_parse_percent(cell(cells, COL_VAT_PERCENT)?)?,
        inc_amount: amount(COL_INC_AMOUNT)?,
        inc_percent: try_parse_percent(cell(cells, COL_INC_PERCENT)?)?,
        sale_price: amount(COL_SALE_PRICE)?,
    })
}
