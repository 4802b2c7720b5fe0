//! Header field extraction from first-page text.

use chrono::NaiveDate;

use crate::diagnostics::Diagnostics;
use crate::models::invoice::HeaderFields;

use super::kind::HeaderMarkers;
use super::rules::FieldExtractor;

const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parse an issue date in one of the formats DIAN representations print.
pub fn parse_issue_date(text: &str) -> Option<NaiveDate> {
    let text = text.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Read the header fields. Missing fields are left empty and reported.
pub fn extract_header(
    markers: &HeaderMarkers,
    text: &str,
    diagnostics: &mut Diagnostics,
) -> HeaderFields {
    let mut read = |name: &str, pair: &dyn FieldExtractor<Output = String>| -> String {
        let value = pair.extract(text).unwrap_or_default();
        if value.is_empty() {
            diagnostics.warn("extract_header", format!("missing field: {}", name));
        }
        value
    };

    let header = HeaderFields {
        party_name: read("party name", &markers.party_name),
        tax_id: read("issuer tax id", &markers.tax_id),
        issue_date: read("issue date", &markers.issue_date),
        invoice_number: read("invoice number", &markers.invoice_number),
    };

    if !header.issue_date.is_empty() && parse_issue_date(&header.issue_date).is_none() {
        diagnostics.warn(
            "extract_header",
            format!("unrecognized issue date format: {:?}", header.issue_date),
        );
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::DocumentKind;
    use pretty_assertions::assert_eq;

    const SALE_PAGE: &str = "\
Factura Electrónica de Venta
Razón Social: COMERCIALIZADORA ANDINA S.A.S Nombre Comercial: ANDINA
Nit del Emisor: 900123456 País: Colombia
Fecha de Emisión: 15/01/2024 Medio de Pago: Transferencia
Número de Factura: FEV-1024 Forma de pago: Contado";

    #[test]
    fn test_sale_header() {
        let mut diag = Diagnostics::new();
        let header = extract_header(
            &DocumentKind::SaleInvoice.header_markers(),
            SALE_PAGE,
            &mut diag,
        );

        assert_eq!(
            header,
            HeaderFields {
                party_name: "COMERCIALIZADORA ANDINA S.A.S".to_string(),
                tax_id: "900123456".to_string(),
                issue_date: "15/01/2024".to_string(),
                invoice_number: "FEV-1024".to_string(),
            }
        );
        assert!(diag.is_empty());
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let mut diag = Diagnostics::new();
        let header = extract_header(
            &DocumentKind::PurchaseInvoice.header_markers(),
            SALE_PAGE,
            &mut diag,
        );

        assert_eq!(header.party_name, "");
        assert_eq!(header.tax_id, "900123456");
        assert_eq!(diag.warnings().count(), 1);
        assert!(diag.entries()[0].message.contains("party name"));
    }

    #[test]
    fn test_unrecognized_date_warns() {
        let mut diag = Diagnostics::new();
        let text = "Fecha de Emisión: enero 15 Medio de Pago:";
        let header = extract_header(&DocumentKind::SaleInvoice.header_markers(), text, &mut diag);
        assert_eq!(header.issue_date, "enero 15");
        assert!(diag.warnings().any(|d| d.message.contains("issue date format")));
    }

    #[test]
    fn test_parse_issue_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_issue_date("15/01/2024"), expected);
        assert_eq!(parse_issue_date("2024-01-15 10:32:00"), expected);
        assert_eq!(parse_issue_date("15-01-2024"), expected);
        assert_eq!(parse_issue_date("ayer"), None);
    }
}
