//! Literal markers and regex patterns of the DIAN graphic representation.

use lazy_static::lazy_static;
use regex::Regex;

use super::fields::MarkerPair;
use crate::models::invoice::TaxKind;

// Header markers
pub const ISSUER_NAME: MarkerPair = MarkerPair::new("Razón Social:", "Nombre Comercial:");
pub const BUYER_NAME: MarkerPair = MarkerPair::new("Nombre o Razón Social:", "Tipo de Documento:");
pub const ISSUER_TAX_ID: MarkerPair = MarkerPair::new("Nit del Emisor:", "País:");
pub const ISSUE_DATE: MarkerPair = MarkerPair::new("Fecha de Emisión:", "Medio de Pago:");
pub const INVOICE_NUMBER: MarkerPair = MarkerPair::new("Número de Factura:", "Forma de pago:");

// Document type phrases, in classification priority order
pub const SALE_INVOICE_PHRASE: &str = "Factura Electrónica de Venta";
pub const CREDIT_NOTE_PHRASE: &str = "Nota Crédito de la Factura Electrónica";
pub const DEBIT_NOTE_PHRASE: &str = "Nota Débito de la Factura Electrónica";
pub const PURCHASE_INVOICE_PHRASE: &str = "Factura de Compra Electrónica";
pub const EXPENSE_INVOICE_PHRASE: &str = "Factura de Gastos";
pub const NEW_PURCHASES_PHRASE: &str = "Compras Nuevos";

/// Label cells carried through as VAT "rates" instead of percentages.
pub const SPECIAL_TAX_LABELS: [&str; 3] = ["IBUA", "ICUI", "OTROS IMPUESTOS"];

// Amount after a label: optional `$`/spaces, then a Colombian number
macro_rules! tax_pattern {
    ($label:literal) => {
        Regex::new(concat!("(?i)", $label, r"\s*[$\s]*(\d[\d.,]*)")).unwrap()
    };
}

lazy_static! {
    // Total IVA
    pub static ref TOTAL_VAT: Vec<Regex> = vec![
        tax_pattern!(r"Total\s+IVA"),
        tax_pattern!(r"\bIVA"),
    ];

    // Total INC
    pub static ref TOTAL_INC: Vec<Regex> = vec![
        tax_pattern!(r"Total\s+INC\b"),
        tax_pattern!(r"\bINC\b"),
    ];

    // Impuesto a las bolsas plásticas
    pub static ref TOTAL_BAGS: Vec<Regex> = vec![
        tax_pattern!(r"Bolsas"),
    ];

    // Bebidas ultraprocesadas azucaradas
    pub static ref IBUA: Vec<Regex> = vec![
        tax_pattern!(r"\bIBUA\b"),
    ];

    // Comestibles ultraprocesados
    pub static ref ICUI: Vec<Regex> = vec![
        tax_pattern!(r"\bICUI\b"),
    ];

    pub static ref OTHER_TAXES: Vec<Regex> = vec![
        tax_pattern!(r"Otros\s+impuestos"),
    ];

    // Withholdings
    pub static ref WITHHOLDING_SOURCE: Vec<Regex> = vec![
        tax_pattern!(r"Rete\s*fuente"),
    ];

    pub static ref WITHHOLDING_VAT: Vec<Regex> = vec![
        tax_pattern!(r"Rete\s*IVA"),
    ];

    pub static ref WITHHOLDING_ICA: Vec<Regex> = vec![
        tax_pattern!(r"Rete\s*ICA"),
    ];
}

/// Candidate patterns for a tax kind, most specific first.
pub fn tax_patterns(kind: TaxKind) -> &'static [Regex] {
    match kind {
        TaxKind::Vat => &TOTAL_VAT,
        TaxKind::Inc => &TOTAL_INC,
        TaxKind::BagTax => &TOTAL_BAGS,
        TaxKind::Ibua => &IBUA,
        TaxKind::Icui => &ICUI,
        TaxKind::OtherTaxes => &OTHER_TAXES,
        TaxKind::WithholdingSource => &WITHHOLDING_SOURCE,
        TaxKind::WithholdingVat => &WITHHOLDING_VAT,
        TaxKind::WithholdingIca => &WITHHOLDING_ICA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for kind in TaxKind::ALL {
            assert!(!tax_patterns(kind).is_empty());
        }
    }

    #[test]
    fn test_vat_pattern_captures_amount() {
        let caps = TOTAL_VAT[1].captures("IVA $ 19.000,00").unwrap();
        assert_eq!(&caps[1], "19.000,00");
    }

    #[test]
    fn test_inc_pattern_requires_word() {
        assert!(TOTAL_INC[1].captures("Incluye 100").is_none());
        assert!(TOTAL_INC[1].captures("INC 100").is_some());
    }
}
