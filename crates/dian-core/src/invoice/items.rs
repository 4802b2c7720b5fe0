//! Line-item table parsing and aggregation of taxable base per VAT rate.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::error::ExtractionError;
use crate::models::invoice::VatRate;
use crate::pdf::table::ASSUMED_VAT_MARKER;
use crate::pdf::{clean_row, PdfPage};

use super::rules::{parse_amount, try_parse_amount, vat_rate_from_cell, Result};

// Column positions of the DIAN item grid
pub const COL_SEQUENCE: usize = 0;
pub const COL_CODE: usize = 1;
pub const COL_DESCRIPTION: usize = 2;
pub const COL_UNIT: usize = 3;
pub const COL_QUANTITY: usize = 4;
pub const COL_UNIT_PRICE: usize = 5;
pub const COL_DISCOUNT: usize = 6;
pub const COL_SURCHARGE: usize = 7;
pub const COL_VAT_AMOUNT: usize = 8;
pub const COL_VAT_PERCENT: usize = 9;
pub const COL_INC_AMOUNT: usize = 10;
pub const COL_INC_PERCENT: usize = 11;
pub const COL_SALE_PRICE: usize = 12;

/// Cell at `column`, or an error naming the missing column.
pub(crate) fn cell(cells: &[String], column: usize) -> Result<&str> {
    cells
        .get(column)
        .map(String::as_str)
        .ok_or(ExtractionError::MissingColumn {
            column,
            len: cells.len(),
        })
}

fn is_sequence_number(cell: &str) -> bool {
    !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit())
}

/// A candidate item row has at least `min_cells` cells and an all-digit
/// sequence number in the first cell.
pub fn is_item_row(cells: &[String], min_cells: usize) -> bool {
    cells.len() >= min_cells && cells.first().is_some_and(|c| is_sequence_number(c))
}

/// Summed taxable base per VAT rate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VatBuckets {
    buckets: BTreeMap<VatRate, Decimal>,
}

impl VatBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `base` to the bucket of `rate`. An overflowing sum leaves the
    /// bucket unchanged.
    pub fn add(&mut self, rate: VatRate, base: Decimal) -> Result<()> {
        let total = self.buckets.entry(rate).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(base)
            .ok_or(ExtractionError::Overflow { field: "taxable base" })?;
        Ok(())
    }

    pub fn get(&self, rate: &VatRate) -> Option<Decimal> {
        self.buckets.get(rate).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VatRate, &Decimal)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Discount data collected from purchase documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscountSummary {
    /// Sum of positive per-item discounts.
    pub detail_discounts: Decimal,
    /// Value of the "IVA ASUMIDO" line, if any.
    pub assumed_vat: Decimal,
    /// Set by a positive item discount or an assumed-VAT line.
    pub has_discount: bool,
}

impl DiscountSummary {
    /// Amount of the synthetic discount row: the item discounts when
    /// positive, else the assumed VAT. `None` without any discount.
    pub fn amount(&self) -> Option<Decimal> {
        if !self.has_discount {
            return None;
        }
        if self.detail_discounts > Decimal::ZERO {
            Some(self.detail_discounts)
        } else {
            Some(self.assumed_vat)
        }
    }
}

/// Everything gathered from the item tables of one document.
#[derive(Debug, Clone, Default)]
pub struct LineItemSummary {
    pub buckets: VatBuckets,
    pub discounts: DiscountSummary,
    /// Item rows rejected by numeric parsing.
    pub skipped_rows: usize,
}

/// Scans item tables and aggregates them by VAT rate.
pub struct LineItemParser {
    min_cells: usize,
    track_discounts: bool,
}

impl LineItemParser {
    pub fn new() -> Self {
        Self {
            min_cells: 10,
            track_discounts: false,
        }
    }

    /// Set the minimum number of cells of an item row.
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// Collect item discounts and the assumed-VAT line.
    pub fn with_discounts(mut self, track: bool) -> Self {
        self.track_discounts = track;
        self
    }

    pub fn parse(&self, pages: &[PdfPage], diagnostics: &mut Diagnostics) -> LineItemSummary {
        let mut summary = LineItemSummary::default();

        for page in pages {
            for table in &page.tables {
                for raw in table {
                    let cells = clean_row(raw);

                    if is_item_row(&cells, self.min_cells) {
                        if let Err(e) = self.add_item(&cells, &mut summary, diagnostics) {
                            diagnostics.warn(
                                "parse_line_items",
                                format!(
                                    "skipping item row {} on page {}: {}",
                                    cells[COL_SEQUENCE], page.number, e
                                ),
                            );
                            summary.skipped_rows += 1;
                        }
                    } else if self.track_discounts && is_assumed_vat_row(&cells) {
                        summary.discounts.assumed_vat =
                            parse_amount(&cells[COL_UNIT_PRICE], diagnostics);
                        summary.discounts.has_discount = true;
                        debug!("Assumed VAT {}", summary.discounts.assumed_vat);
                    }
                }
            }
        }

        debug!(
            "Aggregated {} VAT buckets, {} rows skipped",
            summary.buckets.len(),
            summary.skipped_rows
        );
        summary
    }

    fn add_item(
        &self,
        cells: &[String],
        summary: &mut LineItemSummary,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let unit_price = try_parse_amount(cell(cells, COL_UNIT_PRICE)?)?;
        let rate = vat_rate_from_cell(cell(cells, COL_VAT_PERCENT)?)?;

        let discount = if self.track_discounts {
            parse_amount(cell(cells, COL_DISCOUNT)?, diagnostics)
        } else {
            Decimal::ZERO
        };

        // Both sums are checked before either is applied
        let detail_discounts = if discount > Decimal::ZERO {
            let total = summary
                .discounts
                .detail_discounts
                .checked_add(discount)
                .ok_or(ExtractionError::Overflow { field: "discount" })?;
            Some(total)
        } else {
            None
        };

        summary.buckets.add(rate, unit_price)?;
        if let Some(total) = detail_discounts {
            summary.discounts.detail_discounts = total;
            summary.discounts.has_discount = true;
        }

        Ok(())
    }
}

impl Default for LineItemParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The "IVA ASUMIDO" line has no sequence number, the label in cell 3 and
/// its value in cell 5.
fn is_assumed_vat_row(cells: &[String]) -> bool {
    cells.len() > COL_UNIT_PRICE
        && !is_sequence_number(&cells[COL_SEQUENCE])
        && cells[COL_UNIT].contains(ASSUMED_VAT_MARKER)
}
