//! Subcommands of the `dian` binary.

pub mod batch;
pub mod classify;
pub mod config;
pub mod export;
pub mod process;

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use dian_core::models::config::DianConfig;
use dian_core::DocumentKind;

/// Document type selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Detect from the first page
    Auto,
    /// Factura de Venta
    Venta,
    /// Factura de Compra
    Compra,
    /// Nota Crédito
    Credito,
    /// Nota Débito
    Debito,
    /// Facturas de Compras Nuevos
    ComprasNuevos,
    /// Facturas de Gastos
    Gastos,
}

impl KindArg {
    /// The selected kind; `None` means classify.
    pub fn kind(self) -> Option<DocumentKind> {
        match self {
            KindArg::Auto => None,
            KindArg::Venta => Some(DocumentKind::SaleInvoice),
            KindArg::Compra => Some(DocumentKind::PurchaseInvoice),
            KindArg::Credito => Some(DocumentKind::CreditNote),
            KindArg::Debito => Some(DocumentKind::DebitNote),
            KindArg::ComprasNuevos => Some(DocumentKind::NewPurchasesInvoice),
            KindArg::Gastos => Some(DocumentKind::ExpenseInvoice),
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dian")
        .join("config.json")
}

/// Load the configuration from `path`, else the default file if it
/// exists, else built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<DianConfig> {
    if let Some(path) = path {
        return Ok(DianConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(DianConfig::from_file(&default_path)?)
    } else {
        Ok(DianConfig::default())
    }
}

/// Whether a file looks like an input document (PDF or JSON page dump).
pub fn is_input_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_arg_mapping() {
        assert_eq!(KindArg::Auto.kind(), None);
        assert_eq!(KindArg::Compra.kind(), Some(DocumentKind::PurchaseInvoice));
        assert_eq!(
            KindArg::ComprasNuevos.kind(),
            Some(DocumentKind::NewPurchasesInvoice)
        );
    }

    #[test]
    fn test_is_input_file() {
        assert!(is_input_file(Path::new("a/factura.PDF")));
        assert!(is_input_file(Path::new("dump.json")));
        assert!(!is_input_file(Path::new("notes.txt")));
    }
}
