//! Assembly of the 24-column accounting rows.

use rust_decimal::Decimal;

use crate::models::invoice::{DocumentKind, HeaderFields, OutputRow, TaxTotals, VatRate};

use super::rules::vat_indicator;

const CONCEPT: &str = "PRINCIPAL";
const UNIT: &str = "UNIDAD";

/// Row of one VAT bucket. The tax totals are repeated on every row of the
/// document.
pub fn build_row(
    kind: DocumentKind,
    header: &HeaderFields,
    rate: &VatRate,
    base: Decimal,
    totals: &TaxTotals,
) -> OutputRow {
    OutputRow {
        party_name: header.party_name.clone(),
        document_type: kind,
        prefix: String::new(),
        document_number: header.tax_id.clone(),
        date: header.issue_date.clone(),
        vat_indicator: vat_indicator(rate),
        concept: CONCEPT.to_string(),
        quantity: Decimal::ONE,
        unit: UNIT.to_string(),
        taxable_base: base,
        vat_percent: rate.clone(),
        tax_id: header.tax_id.clone(),
        invoice_number: header.invoice_number.clone(),
        invoice_date: header.issue_date.clone(),
        control_number: header.invoice_number.clone(),
        total_vat: totals.vat,
        total_inc: totals.inc,
        total_bags: totals.bag_tax,
        other_taxes: totals.other_taxes,
        ibua: totals.ibua,
        icui: totals.icui,
        withholding_source: totals.withholding_source,
        withholding_vat: totals.withholding_vat,
        withholding_ica: totals.withholding_ica,
    }
}

/// Synthetic discount row: zero VAT, the discount account as indicator,
/// the amount as concept and zero quantity.
pub fn build_discount_row(
    kind: DocumentKind,
    header: &HeaderFields,
    amount: Decimal,
    totals: &TaxTotals,
    indicator: &str,
) -> OutputRow {
    let mut row = build_row(kind, header, &VatRate::percent(0), amount, totals);
    row.vat_indicator = indicator.to_string();
    row.concept = amount.normalize().to_string();
    row.quantity = Decimal::ZERO;
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header() -> HeaderFields {
        HeaderFields {
            party_name: "ACME S.A.S".to_string(),
            tax_id: "900123456".to_string(),
            issue_date: "15/01/2024".to_string(),
            invoice_number: "FV-1".to_string(),
        }
    }

    #[test]
    fn test_build_row_fields() {
        let totals = TaxTotals {
            vat: Decimal::new(19000, 0),
            withholding_ica: Decimal::new(110, 0),
            ..TaxTotals::default()
        };
        let row = build_row(
            DocumentKind::SaleInvoice,
            &header(),
            &VatRate::percent(19),
            Decimal::new(100000, 0),
            &totals,
        );

        assert_eq!(
            row.to_record(),
            vec![
                "ACME S.A.S",
                "Factura de Venta",
                "",
                "900123456",
                "15/01/2024",
                "001",
                "PRINCIPAL",
                "1",
                "UNIDAD",
                "100000.00",
                "19",
                "900123456",
                "FV-1",
                "15/01/2024",
                "FV-1",
                "19000.00",
                "0.00",
                "0.00",
                "0.00",
                "0.00",
                "0.00",
                "0.00",
                "0.00",
                "110.00",
            ]
        );
    }

    #[test]
    fn test_build_discount_row() {
        let row = build_discount_row(
            DocumentKind::PurchaseInvoice,
            &header(),
            Decimal::new(500000, 2),
            &TaxTotals::default(),
            "42104001",
        );

        assert_eq!(row.vat_indicator, "42104001");
        assert_eq!(row.concept, "5000");
        assert_eq!(row.quantity, Decimal::ZERO);
        assert_eq!(row.vat_percent, VatRate::percent(0));
        assert_eq!(row.to_record()[9], "5000.00");
        assert_eq!(row.document_type, DocumentKind::PurchaseInvoice);
    }
}
