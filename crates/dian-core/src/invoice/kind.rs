//! Document kinds: header marker sets and classification.

use crate::models::invoice::DocumentKind;

use super::rules::fields::MarkerPair;
use super::rules::patterns::*;

/// Marker pairs of the header fields read for one document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMarkers {
    pub party_name: MarkerPair,
    pub tax_id: MarkerPair,
    pub issue_date: MarkerPair,
    pub invoice_number: MarkerPair,
}

/// Shape of the rows a kind produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLayout {
    /// One row per VAT bucket.
    Standard,
    /// One row per VAT bucket plus a discount list.
    WithDiscounts,
}

/// Classification phrases in priority order; first match wins.
const CLASSIFICATION: [(&str, DocumentKind); 6] = [
    (SALE_INVOICE_PHRASE, DocumentKind::SaleInvoice),
    (CREDIT_NOTE_PHRASE, DocumentKind::CreditNote),
    (DEBIT_NOTE_PHRASE, DocumentKind::DebitNote),
    (PURCHASE_INVOICE_PHRASE, DocumentKind::PurchaseInvoice),
    (EXPENSE_INVOICE_PHRASE, DocumentKind::ExpenseInvoice),
    (NEW_PURCHASES_PHRASE, DocumentKind::NewPurchasesInvoice),
];

impl DocumentKind {
    /// Header markers for this kind.
    ///
    /// Notes reuse the sale markers and new-purchase invoices the purchase
    /// markers; no sample documents of those kinds have confirmed them.
    pub fn header_markers(&self) -> HeaderMarkers {
        let party_name = match self {
            DocumentKind::SaleInvoice | DocumentKind::CreditNote | DocumentKind::DebitNote => {
                ISSUER_NAME
            }
            DocumentKind::PurchaseInvoice
            | DocumentKind::ExpenseInvoice
            | DocumentKind::NewPurchasesInvoice => BUYER_NAME,
        };

        HeaderMarkers {
            party_name,
            tax_id: ISSUER_TAX_ID,
            issue_date: ISSUE_DATE,
            invoice_number: INVOICE_NUMBER,
        }
    }

    pub fn row_layout(&self) -> RowLayout {
        match self {
            DocumentKind::PurchaseInvoice => RowLayout::WithDiscounts,
            _ => RowLayout::Standard,
        }
    }

    /// Determine the document kind from first-page text.
    pub fn classify(text: &str) -> Option<Self> {
        CLASSIFICATION
            .iter()
            .find(|(phrase, _)| text.contains(phrase))
            .map(|(_, kind)| *kind)
    }
}
