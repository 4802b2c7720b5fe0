//! CSV and JSON export of extracted rows, one file per bucket.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use dian_core::models::collection::{Bucket, FailureRecord, ResultCollection};
use dian_core::models::config::ExportConfig;
use dian_core::{InventoryItem, OutputRow};

pub const INVENTORY_BUCKET: &str = "inventario";
pub const ERROR_BUCKET: &str = "errores";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One CSV file per bucket with human-readable headers
    Csv,
    /// One JSON array per bucket, rows keyed by column letter
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Something that can be written as one table row.
pub trait Record: Serialize {
    fn headers() -> Vec<&'static str>;
    fn record(&self) -> Vec<String>;
}

impl Record for OutputRow {
    fn headers() -> Vec<&'static str> {
        OutputRow::headers().to_vec()
    }

    fn record(&self) -> Vec<String> {
        self.to_record()
    }
}

impl Record for InventoryItem {
    fn headers() -> Vec<&'static str> {
        InventoryItem::headers().to_vec()
    }

    fn record(&self) -> Vec<String> {
        self.to_record()
    }
}

impl Record for FailureRecord {
    fn headers() -> Vec<&'static str> {
        FailureRecord::headers().to_vec()
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.file.clone(),
            self.document_type.clone(),
            self.message.clone(),
        ]
    }
}

/// Render records as CSV, header line first.
pub fn to_csv<T: Record>(records: &[T], delimiter: char) -> anyhow::Result<String> {
    if !delimiter.is_ascii() {
        anyhow::bail!("CSV delimiter must be an ASCII character, got {:?}", delimiter);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(vec![]);

    wtr.write_record(T::headers())?;
    for record in records {
        wtr.write_record(record.record())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Render records in the requested format.
pub fn render<T: Record>(
    records: &[T],
    format: ExportFormat,
    config: &ExportConfig,
) -> anyhow::Result<String> {
    match format {
        ExportFormat::Csv => to_csv(records, config.delimiter),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn write_bucket<T: Record>(
    dir: &Path,
    name: &str,
    records: &[T],
    format: ExportFormat,
    config: &ExportConfig,
) -> anyhow::Result<Option<PathBuf>> {
    if records.is_empty() && !config.write_empty_buckets {
        return Ok(None);
    }

    let path = dir.join(format!("{}.{}", name, format.extension()));
    fs::write(&path, render(records, format, config)?)?;
    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(Some(path))
}

/// Write every bucket of `collection` into `dir`; returns the files written.
pub fn write_collection(
    dir: &Path,
    collection: &ResultCollection,
    format: ExportFormat,
    config: &ExportConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for bucket in Bucket::ALL {
        written.extend(write_bucket(
            dir,
            bucket.name(),
            collection.rows(bucket),
            format,
            config,
        )?);
    }
    written.extend(write_bucket(
        dir,
        INVENTORY_BUCKET,
        collection.inventory(),
        format,
        config,
    )?);
    written.extend(write_bucket(
        dir,
        ERROR_BUCKET,
        collection.failures(),
        format,
        config,
    )?);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dian_core::diagnostics::Diagnostics;
    use dian_core::invoice::builder::build_row;
    use dian_core::{DocumentKind, HeaderFields, PipelineOutput, TaxTotals, VatRate};

    fn row() -> OutputRow {
        let header = HeaderFields {
            party_name: "ACME; S.A.S".to_string(),
            tax_id: "900123456".to_string(),
            issue_date: "15/01/2024".to_string(),
            invoice_number: "FV-1".to_string(),
        };
        build_row(
            DocumentKind::SaleInvoice,
            &header,
            &VatRate::percent(19),
            100_000.into(),
            &TaxTotals::default(),
        )
    }

    #[test]
    fn test_csv_headers_and_values() {
        let csv = to_csv(&[row()], ',').unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("Razón Social,Tipo Documento,Prefijo"));
        let data = lines.next().unwrap();
        assert!(data.starts_with("ACME; S.A.S,Factura de Venta,,900123456,15/01/2024,001"));
        assert!(data.contains("100000.00"));
    }

    #[test]
    fn test_csv_custom_delimiter_quotes_fields() {
        let csv = to_csv(&[row()], ';').unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"ACME; S.A.S\";Factura de Venta"));
        assert!(to_csv(&[row()], 'ñ').is_err());
    }

    #[test]
    fn test_json_uses_letter_keys() {
        let json = render(&[row()], ExportFormat::Json, &ExportConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["A"], "ACME; S.A.S");
        assert_eq!(value[0]["B"], "Factura de Venta");
        assert_eq!(value[0]["J"], "100000.00");
        assert_eq!(value[0]["K"], "19");
    }

    #[test]
    fn test_write_collection_skips_empty_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = ResultCollection::new();
        collection.record(
            "a.pdf",
            DocumentKind::SaleInvoice,
            Some(PipelineOutput::Rows(vec![row()])),
            None,
            &Diagnostics::new(),
        );
        collection.record_failure("b.pdf", "Factura de Compra", "PDF has no pages");

        let written = write_collection(
            dir.path(),
            &collection,
            ExportFormat::Csv,
            &ExportConfig::default(),
        )
        .unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["venta.csv", "errores.csv"]);

        let errors = fs::read_to_string(dir.path().join("errores.csv")).unwrap();
        assert!(errors.starts_with("Archivo,Tipo,Error"));
        assert!(errors.contains("b.pdf,Factura de Compra,PDF has no pages"));
    }

    #[test]
    fn test_write_empty_buckets_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            write_empty_buckets: true,
            ..ExportConfig::default()
        };
        let written =
            write_collection(dir.path(), &ResultCollection::new(), ExportFormat::Json, &config)
                .unwrap();
        assert_eq!(written.len(), Bucket::ALL.len() + 2);
        assert_eq!(fs::read_to_string(dir.path().join("gastos.json")).unwrap(), "[]");
    }
}
