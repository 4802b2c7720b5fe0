//! Per-bucket collection of rows produced over a batch of documents.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::invoice::PipelineOutput;

use super::invoice::{DocumentKind, InventoryItem, OutputRow};

/// Output bucket, one sheet or file per bucket on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Sales,
    Purchases,
    CreditNotes,
    DebitNotes,
    NewPurchases,
    Expenses,
    Discounts,
}

impl Bucket {
    pub const ALL: [Bucket; 7] = [
        Bucket::Sales,
        Bucket::Purchases,
        Bucket::CreditNotes,
        Bucket::DebitNotes,
        Bucket::NewPurchases,
        Bucket::Expenses,
        Bucket::Discounts,
    ];

    /// Sheet (and file stem) name.
    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Sales => "venta",
            Bucket::Purchases => "compra",
            Bucket::CreditNotes => "credito",
            Bucket::DebitNotes => "debito",
            Bucket::NewPurchases => "compras_nuevos",
            Bucket::Expenses => "gastos",
            Bucket::Discounts => "descuentos",
        }
    }

    /// Bucket receiving the ordinary rows of a document kind.
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::SaleInvoice => Bucket::Sales,
            DocumentKind::PurchaseInvoice => Bucket::Purchases,
            DocumentKind::CreditNote => Bucket::CreditNotes,
            DocumentKind::DebitNote => Bucket::DebitNotes,
            DocumentKind::NewPurchasesInvoice => Bucket::NewPurchases,
            DocumentKind::ExpenseInvoice => Bucket::Expenses,
        }
    }
}

/// A document that produced no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    #[serde(rename = "Archivo")]
    pub file: String,
    #[serde(rename = "Tipo")]
    pub document_type: String,
    #[serde(rename = "Error")]
    pub message: String,
}

impl FailureRecord {
    pub fn headers() -> [&'static str; 3] {
        ["Archivo", "Tipo", "Error"]
    }
}

/// Rows collected across a batch, grouped by bucket.
#[derive(Debug, Default)]
pub struct ResultCollection {
    rows: BTreeMap<Bucket, Vec<OutputRow>>,
    inventory: Vec<InventoryItem>,
    failures: Vec<FailureRecord>,
    processed: usize,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one document.
    ///
    /// A missing output or an output without ordinary rows counts as a
    /// failure; discount and inventory rows are only kept alongside
    /// ordinary rows.
    pub fn record(
        &mut self,
        file: &str,
        kind: DocumentKind,
        output: Option<PipelineOutput>,
        inventory: Option<Vec<InventoryItem>>,
        diagnostics: &Diagnostics,
    ) {
        let Some(output) = output else {
            let message = diagnostics
                .last_fatal()
                .map(|d| d.message.clone())
                .unwrap_or_else(|| "document could not be processed".to_string());
            self.record_failure(file, kind.label(), message);
            return;
        };

        let (rows, discounts) = output.into_parts();
        if rows.is_empty() {
            self.record_failure(file, kind.label(), "no line items found");
            return;
        }

        self.rows.entry(Bucket::for_kind(kind)).or_default().extend(rows);
        if !discounts.is_empty() {
            self.rows
                .entry(Bucket::Discounts)
                .or_default()
                .extend(discounts);
        }
        if let Some(items) = inventory {
            self.inventory.extend(items);
        }
        self.processed += 1;
    }

    pub fn record_failure(
        &mut self,
        file: &str,
        document_type: &str,
        message: impl Into<String>,
    ) {
        self.failures.push(FailureRecord {
            file: file.to_string(),
            document_type: document_type.to_string(),
            message: message.into(),
        });
    }

    pub fn rows(&self, bucket: Bucket) -> &[OutputRow] {
        self.rows.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Documents that produced rows.
    pub fn processed_count(&self) -> usize {
        self.processed
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
