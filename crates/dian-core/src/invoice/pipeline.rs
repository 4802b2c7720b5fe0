//! Per-kind extraction pipelines: one document in, accounting rows out.

use std::path::Path;

use tracing::{debug, info};

use crate::diagnostics::Diagnostics;
use crate::error::{ExtractionError, PdfError};
use crate::models::config::{DianConfig, ExtractionConfig, PdfConfig};
use crate::models::invoice::{DocumentKind, InventoryItem, OutputRow};
use crate::pdf::{open_document, PdfProcessor};

use super::builder::{build_discount_row, build_row};
use super::header::extract_header;
use super::inventory::InventoryExtractor;
use super::items::LineItemParser;
use super::kind::RowLayout;
use super::rules::extract_tax_totals;

/// Rows produced for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutput {
    /// One row per VAT bucket.
    Rows(Vec<OutputRow>),
    /// Purchase invoices: bucket rows plus zero or one discount row.
    Purchase {
        rows: Vec<OutputRow>,
        discounts: Vec<OutputRow>,
    },
}

impl PipelineOutput {
    pub fn rows(&self) -> &[OutputRow] {
        match self {
            PipelineOutput::Rows(rows) | PipelineOutput::Purchase { rows, .. } => rows.as_slice(),
        }
    }

    pub fn discounts(&self) -> &[OutputRow] {
        match self {
            PipelineOutput::Rows(_) => &[],
            PipelineOutput::Purchase { discounts, .. } => discounts.as_slice(),
        }
    }

    /// Split into (bucket rows, discount rows).
    pub fn into_parts(self) -> (Vec<OutputRow>, Vec<OutputRow>) {
        match self {
            PipelineOutput::Rows(rows) => (rows, Vec::new()),
            PipelineOutput::Purchase { rows, discounts } => (rows, discounts),
        }
    }
}

/// Everything extracted from one file.
#[derive(Debug, Default)]
pub struct FileOutcome {
    /// Kind the file was processed as; `None` if it could not be classified.
    pub kind: Option<DocumentKind>,
    pub output: Option<PipelineOutput>,
    pub inventory: Option<Vec<InventoryItem>>,
}

/// Runs the extraction stages for a document kind.
pub struct Pipeline {
    pdf: PdfConfig,
    extraction: ExtractionConfig,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            pdf: PdfConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }

    pub fn with_config(config: &DianConfig) -> Self {
        Self {
            pdf: config.pdf.clone(),
            extraction: config.extraction.clone(),
        }
    }

    /// Extract the rows of `doc` as a document of `kind`.
    pub fn extract(
        &self,
        kind: DocumentKind,
        doc: &dyn PdfProcessor,
        diagnostics: &mut Diagnostics,
    ) -> crate::Result<PipelineOutput> {
        if doc.page_count() == 0 {
            return Err(PdfError::NoPages.into());
        }

        let first_page = doc.extract_page_text(1)?;
        if first_page.trim().is_empty() {
            return Err(ExtractionError::EmptyFirstPage.into());
        }

        let header = extract_header(&kind.header_markers(), &first_page, diagnostics);

        let totals = extract_tax_totals(
            &doc.extract_text()?,
            &self.extraction.totals_section_header,
            diagnostics,
        );

        let pages = doc.pages()?;

        let layout = kind.row_layout();
        let summary = LineItemParser::new()
            .with_min_cells(self.extraction.min_item_cells)
            .with_discounts(layout == RowLayout::WithDiscounts)
            .parse(&pages, diagnostics);

        let rows: Vec<OutputRow> = summary
            .buckets
            .iter()
            .map(|(rate, base)| build_row(kind, &header, rate, *base, &totals))
            .collect();

        debug!(
            "{}: {} rows from {} pages",
            kind,
            rows.len(),
            pages.len()
        );

        Ok(match layout {
            RowLayout::Standard => PipelineOutput::Rows(rows),
            RowLayout::WithDiscounts => {
                let discounts = summary
                    .discounts
                    .amount()
                    .map(|amount| {
                        build_discount_row(
                            kind,
                            &header,
                            amount,
                            &totals,
                            &self.extraction.discount_indicator,
                        )
                    })
                    .into_iter()
                    .collect();
                PipelineOutput::Purchase { rows, discounts }
            }
        })
    }

    /// Like [`Pipeline::extract`], but a failure is recorded as a fatal
    /// diagnostic and yields `None`.
    pub fn run(
        &self,
        kind: DocumentKind,
        doc: &dyn PdfProcessor,
        diagnostics: &mut Diagnostics,
    ) -> Option<PipelineOutput> {
        match self.extract(kind, doc, diagnostics) {
            Ok(output) => Some(output),
            Err(e) => {
                diagnostics.fatal("extract", e.to_string());
                None
            }
        }
    }

    /// Inventory rows of `doc`; failures are recorded and yield `None`.
    pub fn run_inventory(
        &self,
        doc: &dyn PdfProcessor,
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<InventoryItem>> {
        let extractor =
            InventoryExtractor::new().with_min_cells(self.extraction.min_inventory_cells);
        match extractor.extract(doc, diagnostics) {
            Ok(items) => Some(items),
            Err(e) => {
                diagnostics.fatal("extract_inventory", e.to_string());
                None
            }
        }
    }

    /// Open `path`, run the pipeline of `kind` (classifying the first page
    /// when `None`) and, for purchase invoices, the inventory extractor.
    /// The document is released before returning.
    pub fn process_file(
        &self,
        kind: Option<DocumentKind>,
        path: &Path,
        diagnostics: &mut Diagnostics,
    ) -> FileOutcome {
        let doc = match open_document(path, &self.pdf) {
            Ok(doc) => doc,
            Err(e) => {
                diagnostics.fatal("open_document", e.to_string());
                return FileOutcome {
                    kind,
                    ..FileOutcome::default()
                };
            }
        };

        let kind = match kind {
            Some(kind) => kind,
            None => match self.classify(doc.as_ref()) {
                Ok(kind) => kind,
                Err(e) => {
                    diagnostics.fatal("classify", e.to_string());
                    return FileOutcome::default();
                }
            },
        };

        info!("Processing {} as {}", path.display(), kind);
        let output = self.run(kind, doc.as_ref(), diagnostics);

        let inventory = if kind == DocumentKind::PurchaseInvoice
            && self.extraction.extract_inventory
            && output.is_some()
        {
            self.run_inventory(doc.as_ref(), diagnostics)
        } else {
            None
        };

        FileOutcome {
            kind: Some(kind),
            output,
            inventory,
        }
    }

    /// Classify `doc` by its first page.
    pub fn classify(&self, doc: &dyn PdfProcessor) -> crate::Result<DocumentKind> {
        if doc.page_count() == 0 {
            return Err(PdfError::NoPages.into());
        }
        let first_page = doc.extract_page_text(1)?;
        DocumentKind::classify(&first_page)
            .ok_or_else(|| ExtractionError::UnrecognizedDocument.into())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentKind {
    /// Run this kind's pipeline with the default configuration.
    pub fn extract(
        &self,
        doc: &dyn PdfProcessor,
        diagnostics: &mut Diagnostics,
    ) -> Option<PipelineOutput> {
        Pipeline::new().run(*self, doc, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::VatRate;
    use crate::pdf::{MemoryDocument, MemoryPage, Row};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn item(seq: &str, price: &str, discount: &str, vat: &str) -> Row {
        [
            seq, "C1", "Producto", "UND", "1", price, discount, "0", "0", vat, "0", "0", price,
        ]
        .iter()
        .map(|c| Some(c.to_string()))
        .collect()
    }

    const SALE_HEADER: &str = "\
Factura Electrónica de Venta
Razón Social: DISTRIBUIDORA EL SOL S.A.S Nombre Comercial: EL SOL
Nit del Emisor: 900555111 País: Colombia
Fecha de Emisión: 02/03/2024 Medio de Pago: Efectivo
Número de Factura: SETP-88 Forma de pago: Contado";

    const PURCHASE_HEADER: &str = "\
Factura de Compra Electrónica
Nombre o Razón Social: TIENDA LA ESQUINA Tipo de Documento: NIT
Nit del Emisor: 901222333 País: Colombia
Fecha de Emisión: 10/04/2024 Medio de Pago: Crédito
Número de Factura: FC-9 Forma de pago: Crédito";

    const TOTALS: &str = "Datos Totales\nIVA $ 19.000,00\nRete fuente $ 2.500,00";

    #[test]
    fn test_sale_rows_per_vat_rate() {
        let doc = MemoryDocument::new(vec![
            MemoryPage::text(SALE_HEADER).with_table(vec![
                item("1", "60.000,00", "0", "19"),
                item("2", "20.000,00", "0", "0"),
            ]),
            MemoryPage::text(TOTALS).with_table(vec![item("3", "40.000,00", "0", "19,00")]),
        ]);

        let mut diag = Diagnostics::new();
        let output = Pipeline::new()
            .run(DocumentKind::SaleInvoice, &doc, &mut diag)
            .unwrap();
        let rows = output.rows();

        assert_eq!(rows.len(), 2);
        assert!(output.discounts().is_empty());

        let by_rate = |rate: VatRate| rows.iter().find(|r| r.vat_percent == rate).unwrap();
        let general = by_rate(VatRate::percent(19));
        let exempt = by_rate(VatRate::percent(0));

        assert_eq!(general.vat_indicator, "001");
        assert_eq!(general.to_record()[9], "100000.00");
        assert_eq!(exempt.vat_indicator, "003");
        assert_eq!(exempt.to_record()[9], "20000.00");

        for row in rows {
            assert_eq!(row.party_name, "DISTRIBUIDORA EL SOL S.A.S");
            assert_eq!(row.document_type, DocumentKind::SaleInvoice);
            assert_eq!(row.tax_id, "900555111");
            assert_eq!(row.control_number, "SETP-88");
            assert_eq!(row.total_vat, Decimal::new(19000, 0));
            assert_eq!(row.withholding_source, Decimal::new(2500, 0));
        }
        assert!(diag.last_fatal().is_none());
    }

    #[test]
    fn test_purchase_with_discount() {
        let doc = MemoryDocument::new(vec![MemoryPage::text(PURCHASE_HEADER).with_table(vec![
            item("1", "50.000", "3.000", "19"),
            item("2", "30.000", "2.000", "5"),
        ])]);

        let output = DocumentKind::PurchaseInvoice
            .extract(&doc, &mut Diagnostics::new())
            .unwrap();
        let (rows, discounts) = output.into_parts();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].party_name, "TIENDA LA ESQUINA");
        assert_eq!(discounts.len(), 1);

        let discount = &discounts[0];
        assert_eq!(discount.vat_indicator, "42104001");
        assert_eq!(discount.concept, "5000");
        assert_eq!(discount.taxable_base, Decimal::new(5000, 0));
        assert_eq!(discount.quantity, Decimal::ZERO);
        assert_eq!(discount.vat_percent, VatRate::percent(0));
    }

    #[test]
    fn test_purchase_without_discount() {
        let doc = MemoryDocument::new(vec![MemoryPage::text(PURCHASE_HEADER)
            .with_table(vec![item("1", "50.000", "0", "19")])]);

        let output = DocumentKind::PurchaseInvoice
            .extract(&doc, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(output.rows().len(), 1);
        assert!(output.discounts().is_empty());
        assert!(matches!(output, PipelineOutput::Purchase { .. }));
    }

    #[test]
    fn test_expense_ignores_discounts() {
        let doc = MemoryDocument::new(vec![MemoryPage::text("Factura de Gastos")
            .with_table(vec![item("1", "50.000", "4.000", "19")])]);

        let output = DocumentKind::ExpenseInvoice
            .extract(&doc, &mut Diagnostics::new())
            .unwrap();
        assert!(matches!(output, PipelineOutput::Rows(ref rows) if rows.len() == 1));
    }

    #[test]
    fn test_no_qualifying_rows_is_empty_output() {
        let doc = MemoryDocument::new(vec![MemoryPage::text(SALE_HEADER)]);
        let output = DocumentKind::SaleInvoice
            .extract(&doc, &mut Diagnostics::new())
            .unwrap();
        assert!(output.rows().is_empty());
    }

    #[test]
    fn test_unreadable_document_is_none() {
        let doc = MemoryDocument::new(vec![MemoryPage::text("   ")]);
        let mut diag = Diagnostics::new();

        assert!(DocumentKind::SaleInvoice.extract(&doc, &mut diag).is_none());
        let fatal = diag.last_fatal().unwrap();
        assert!(fatal.message.contains("first page"));
    }

    #[test]
    fn test_empty_document_is_none() {
        let doc = MemoryDocument::new(Vec::new());
        let mut diag = Diagnostics::new();
        assert!(DocumentKind::CreditNote.extract(&doc, &mut diag).is_none());
        assert!(diag.last_fatal().is_some());
    }

    #[test]
    fn test_configured_discount_indicator() {
        let mut config = DianConfig::default();
        config.extraction.discount_indicator = "5305".to_string();

        let doc = MemoryDocument::new(vec![MemoryPage::text(PURCHASE_HEADER)
            .with_table(vec![item("1", "50.000", "1.000", "19")])]);
        let output = Pipeline::with_config(&config)
            .run(DocumentKind::PurchaseInvoice, &doc, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(output.discounts()[0].vat_indicator, "5305");
    }

    #[test]
    fn test_classify_document() {
        let doc = MemoryDocument::new(vec![MemoryPage::text(PURCHASE_HEADER)]);
        assert_eq!(
            Pipeline::new().classify(&doc).unwrap(),
            DocumentKind::PurchaseInvoice
        );

        let unknown = MemoryDocument::new(vec![MemoryPage::text("Recibo de caja")]);
        assert!(Pipeline::new().classify(&unknown).is_err());
    }

    #[test]
    fn test_process_file_with_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compra.json");
        let doc = MemoryDocument::new(vec![MemoryPage::text(PURCHASE_HEADER)
            .with_table(vec![item("1", "50.000", "0", "19")])]);
        std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        let mut diag = Diagnostics::new();
        let outcome = Pipeline::new().process_file(None, &path, &mut diag);

        assert_eq!(outcome.kind, Some(DocumentKind::PurchaseInvoice));
        assert_eq!(outcome.output.unwrap().rows().len(), 1);
        let inventory = outcome.inventory.unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].issuer_tax_id, "901222333");
        assert_eq!(inventory[0].invoice_number, "FC-9");
    }

    #[test]
    fn test_process_unclassifiable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recibo.json");
        std::fs::write(&path, r#"{"pages": [{"text": "Recibo de caja"}]}"#).unwrap();

        let mut diag = Diagnostics::new();
        let outcome = Pipeline::new().process_file(None, &path, &mut diag);
        assert!(outcome.kind.is_none());
        assert!(outcome.output.is_none());
        assert_eq!(
            diag.last_fatal().unwrap().message,
            "extraction error: document type not recognized"
        );
    }

    #[test]
    fn test_process_missing_file() {
        let mut diag = Diagnostics::new();
        let outcome = Pipeline::new().process_file(
            Some(DocumentKind::SaleInvoice),
            Path::new("/nonexistent/factura.pdf"),
            &mut diag,
        );
        assert_eq!(outcome.kind, Some(DocumentKind::SaleInvoice));
        assert!(outcome.output.is_none());
        assert!(outcome.inventory.is_none());
        assert!(diag.last_fatal().is_some());
    }
}
