//! DIAN document extraction: header fields, tax totals, line items and
//! accounting rows.

pub mod builder;
mod header;
pub mod inventory;
pub mod items;
mod kind;
mod pipeline;
pub mod rules;

pub use header::{extract_header, parse_issue_date};
pub use inventory::InventoryExtractor;
pub use items::{DiscountSummary, LineItemParser, LineItemSummary, VatBuckets};
pub use kind::{HeaderMarkers, RowLayout};
pub use pipeline::{FileOutcome, Pipeline, PipelineOutput};
