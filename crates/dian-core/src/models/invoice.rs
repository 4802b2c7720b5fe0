//! DIAN invoice data models: header fields, tax totals and accounting rows.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Kind of DIAN document handled by the pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKind {
    /// Factura electrónica de venta.
    SaleInvoice,
    /// Factura de compra.
    PurchaseInvoice,
    /// Nota crédito de una factura electrónica.
    CreditNote,
    /// Nota débito de una factura electrónica.
    DebitNote,
    /// Facturas de compras nuevos.
    NewPurchasesInvoice,
    /// Facturas de gastos.
    ExpenseInvoice,
}

impl DocumentKind {
    /// Label written into the "Tipo Documento" column.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::SaleInvoice => "Factura de Venta",
            DocumentKind::PurchaseInvoice => "Factura de Compra",
            DocumentKind::CreditNote => "Nota Crédito",
            DocumentKind::DebitNote => "Nota Débito",
            DocumentKind::NewPurchasesInvoice => "Facturas de Compras Nuevos",
            DocumentKind::ExpenseInvoice => "Facturas de Gastos",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DocumentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Header values read from the first page through marker pairs.
///
/// Missing markers leave the field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderFields {
    /// Issuer name (sales) or buyer name (purchases).
    pub party_name: String,
    /// Nit del Emisor.
    pub tax_id: String,
    /// Fecha de Emisión, as printed.
    pub issue_date: String,
    /// Número de Factura.
    pub invoice_number: String,
}

/// The nine tax kinds printed in the "Datos Totales" section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxKind {
    Vat,
    Inc,
    BagTax,
    Ibua,
    Icui,
    OtherTaxes,
    WithholdingSource,
    WithholdingVat,
    WithholdingIca,
}

impl TaxKind {
    pub const ALL: [TaxKind; 9] = [
        TaxKind::Vat,
        TaxKind::Inc,
        TaxKind::BagTax,
        TaxKind::Ibua,
        TaxKind::Icui,
        TaxKind::OtherTaxes,
        TaxKind::WithholdingSource,
        TaxKind::WithholdingVat,
        TaxKind::WithholdingIca,
    ];

    /// Column header used for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            TaxKind::Vat => "Total IVA",
            TaxKind::Inc => "Total INC",
            TaxKind::BagTax => "Total Bolsas",
            TaxKind::Ibua => "IBUA",
            TaxKind::Icui => "ICUI",
            TaxKind::OtherTaxes => "Otros Impuestos",
            TaxKind::WithholdingSource => "Rete Fuente",
            TaxKind::WithholdingVat => "Rete IVA",
            TaxKind::WithholdingIca => "Rete ICA",
        }
    }
}

/// Document-level tax totals. Every kind is always present, zero by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxTotals {
    pub vat: Decimal,
    pub inc: Decimal,
    pub bag_tax: Decimal,
    pub ibua: Decimal,
    pub icui: Decimal,
    pub other_taxes: Decimal,
    pub withholding_source: Decimal,
    pub withholding_vat: Decimal,
    pub withholding_ica: Decimal,
}

impl TaxTotals {
    pub fn get(&self, kind: TaxKind) -> Decimal {
        match kind {
            TaxKind::Vat => self.vat,
            TaxKind::Inc => self.inc,
            TaxKind::BagTax => self.bag_tax,
            TaxKind::Ibua => self.ibua,
            TaxKind::Icui => self.icui,
            TaxKind::OtherTaxes => self.other_taxes,
            TaxKind::WithholdingSource => self.withholding_source,
            TaxKind::WithholdingVat => self.withholding_vat,
            TaxKind::WithholdingIca => self.withholding_ica,
        }
    }

    pub fn set(&mut self, kind: TaxKind, value: Decimal) {
        let slot = match kind {
            TaxKind::Vat => &mut self.vat,
            TaxKind::Inc => &mut self.inc,
            TaxKind::BagTax => &mut self.bag_tax,
            TaxKind::Ibua => &mut self.ibua,
            TaxKind::Icui => &mut self.icui,
            TaxKind::OtherTaxes => &mut self.other_taxes,
            TaxKind::WithholdingSource => &mut self.withholding_source,
            TaxKind::WithholdingVat => &mut self.withholding_vat,
            TaxKind::WithholdingIca => &mut self.withholding_ica,
        };
        *slot = value;
    }
}

/// VAT rate key of an aggregation bucket.
///
/// Table cells normally hold a percentage; special-tax labels (IBUA, ICUI,
/// Otros Impuestos) are carried through as their literal text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum VatRate {
    Percent(Decimal),
    Label(String),
}

impl VatRate {
    pub fn percent(value: impl Into<Decimal>) -> Self {
        VatRate::Percent(value.into())
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VatRate::Percent(p) => write!(f, "{}", p.normalize()),
            VatRate::Label(s) => f.write_str(s),
        }
    }
}

impl Serialize for VatRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn money<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_money(*value))
}

fn plain<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.normalize())
}

/// Render an amount with two decimals (`100000.00`).
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Canonical accounting row. Serialized with the letter keys `A`..`X`
/// expected by existing spreadsheet consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "A")]
    pub party_name: String,
    #[serde(rename = "B")]
    pub document_type: DocumentKind,
    #[serde(rename = "C")]
    pub prefix: String,
    #[serde(rename = "D")]
    pub document_number: String,
    #[serde(rename = "E")]
    pub date: String,
    #[serde(rename = "F")]
    pub vat_indicator: String,
    #[serde(rename = "G")]
    pub concept: String,
    #[serde(rename = "H", serialize_with = "plain")]
    pub quantity: Decimal,
    #[serde(rename = "I")]
    pub unit: String,
    #[serde(rename = "J", serialize_with = "money")]
    pub taxable_base: Decimal,
    #[serde(rename = "K")]
    pub vat_percent: VatRate,
    #[serde(rename = "L")]
    pub tax_id: String,
    #[serde(rename = "M")]
    pub invoice_number: String,
    #[serde(rename = "N")]
    pub invoice_date: String,
    #[serde(rename = "O")]
    pub control_number: String,
    #[serde(rename = "P", serialize_with = "money")]
    pub total_vat: Decimal,
    #[serde(rename = "Q", serialize_with = "money")]
    pub total_inc: Decimal,
    #[serde(rename = "R", serialize_with = "money")]
    pub total_bags: Decimal,
    #[serde(rename = "S", serialize_with = "money")]
    pub other_taxes: Decimal,
    #[serde(rename = "T", serialize_with = "money")]
    pub ibua: Decimal,
    #[serde(rename = "U", serialize_with = "money")]
    pub icui: Decimal,
    #[serde(rename = "V", serialize_with = "money")]
    pub withholding_source: Decimal,
    #[serde(rename = "W", serialize_with = "money")]
    pub withholding_vat: Decimal,
    #[serde(rename = "X", serialize_with = "money")]
    pub withholding_ica: Decimal,
}

/// Letter keys and human-readable headers of the 24 output columns, in order.
pub const OUTPUT_COLUMNS: [(&str, &str); 24] = [
    ("A", "Razón Social"),
    ("B", "Tipo Documento"),
    ("C", "Prefijo"),
    ("D", "Número Documento"),
    ("E", "Fecha"),
    ("F", "Indicador IVA"),
    ("G", "Concepto"),
    ("H", "Cantidad"),
    ("I", "Unidad Medida"),
    ("J", "Base Gravable"),
    ("K", "Porcentaje IVA"),
    ("L", "NIT"),
    ("M", "Número Factura"),
    ("N", "Fecha Factura"),
    ("O", "Número Control"),
    ("P", "Total IVA"),
    ("Q", "Total INC"),
    ("R", "Total Bolsas"),
    ("S", "Otros Impuestos"),
    ("T", "IBUA"),
    ("U", "ICUI"),
    ("V", "Rete Fuente"),
    ("W", "Rete IVA"),
    ("X", "Rete ICA"),
];

impl OutputRow {
    /// Human-readable headers, in column order.
    pub fn headers() -> [&'static str; 24] {
        OUTPUT_COLUMNS.map(|(_, header)| header)
    }

    /// Cell values as strings, in column order.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.party_name.clone(),
            self.document_type.label().to_string(),
            self.prefix.clone(),
            self.document_number.clone(),
            self.date.clone(),
            self.vat_indicator.clone(),
            self.concept.clone(),
            self.quantity.normalize().to_string(),
            self.unit.clone(),
            format_money(self.taxable_base),
            self.vat_percent.to_string(),
            self.tax_id.clone(),
            self.invoice_number.clone(),
            self.invoice_date.clone(),
            self.control_number.clone(),
            format_money(self.total_vat),
            format_money(self.total_inc),
            format_money(self.total_bags),
            format_money(self.other_taxes),
            format_money(self.ibua),
            format_money(self.icui),
            format_money(self.withholding_source),
            format_money(self.withholding_vat),
            format_money(self.withholding_ica),
        ]
    }
}

/// One physical item row of the line-item table, without aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub issuer_tax_id: String,
    pub invoice_number: String,
    pub sequence: String,
    pub code: String,
    pub description: String,
    pub unit: String,
    #[serde(serialize_with = "plain")]
    pub quantity: Decimal,
    #[serde(serialize_with = "money")]
    pub unit_price: Decimal,
    #[serde(serialize_with = "money")]
    pub discount: Decimal,
    #[serde(serialize_with = "money")]
    pub surcharge: Decimal,
    #[serde(serialize_with = "money")]
    pub vat_amount: Decimal,
    #[serde(serialize_with = "plain")]
    pub vat_percent: Decimal,
    #[serde(serialize_with = "money")]
    pub inc_amount: Decimal,
    #[serde(serialize_with = "plain")]
    pub inc_percent: Decimal,
    #[serde(serialize_with = "money")]
    pub sale_price: Decimal,
}

impl InventoryItem {
    pub fn headers() -> [&'static str; 15] {
        [
            "NIT Emisor",
            "Número Factura",
            "Nro",
            "Código",
            "Descripción",
            "U/M",
            "Cantidad",
            "Precio Unitario",
            "Descuento",
            "Recargo",
            "IVA",
            "Porcentaje IVA",
            "INC",
            "Porcentaje INC",
            "Precio Venta",
        ]
    }

    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.issuer_tax_id.clone(),
            self.invoice_number.clone(),
            self.sequence.clone(),
            self.code.clone(),
            self.description.clone(),
            self.unit.clone(),
            self.quantity.normalize().to_string(),
            format_money(self.unit_price),
            format_money(self.discount),
            format_money(self.surcharge),
            format_money(self.vat_amount),
            self.vat_percent.normalize().to_string(),
            format_money(self.inc_amount),
            self.inc_percent.normalize().to_string(),
            format_money(self.sale_price),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_totals_get_set() {
        let mut totals = TaxTotals::default();
        for kind in TaxKind::ALL {
            assert_eq!(totals.get(kind), Decimal::ZERO);
        }
        totals.set(TaxKind::WithholdingIca, Decimal::new(1250, 1));
        assert_eq!(totals.withholding_ica, Decimal::new(125, 0));
        assert_eq!(totals.get(TaxKind::WithholdingIca), Decimal::new(125, 0));
    }

    #[test]
    fn test_vat_rate_display() {
        assert_eq!(VatRate::Percent(Decimal::new(1900, 2)).to_string(), "19");
        assert_eq!(VatRate::Percent(Decimal::ZERO).to_string(), "0");
        assert_eq!(VatRate::Label("IBUA".to_string()).to_string(), "IBUA");
    }

    #[test]
    fn test_vat_rate_equality_ignores_scale() {
        assert_eq!(
            VatRate::Percent(Decimal::new(1900, 2)),
            VatRate::Percent(Decimal::new(19, 0))
        );
    }

    #[test]
    fn test_headers_order() {
        let headers = OutputRow::headers();
        assert_eq!(headers[0], "Razón Social");
        assert_eq!(headers[9], "Base Gravable");
        assert_eq!(headers[23], "Rete ICA");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(100000, 0)), "100000.00");
        assert_eq!(format_money(Decimal::new(123456789, 2)), "1234567.89");
    }
}
