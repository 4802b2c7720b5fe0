//! Line-item table reconstruction from page text.
//!
//! DIAN representation PDFs print the item grid as one text line per item:
//!
//! ```text
//! 1 P-001 Servicio de soporte UNIDAD 1,00 $ 100.000,00 0,00 0,00 19.000,00 19,00 0,00 0,00 119.000,00
//! ```
//!
//! The sequence number and product code lead, the unit of measure sits just
//! before the nine trailing numeric columns, and the description is
//! whatever lies between.

use super::{Row, Table};

/// Columns of a reconstructed item row.
pub const ITEM_COLUMNS: usize = 13;

/// Numeric columns at the end of an item row (Cantidad .. Precio venta).
const TRAILING_NUMERIC: usize = 9;

/// Marker of the assumed-VAT summary line.
pub const ASSUMED_VAT_MARKER: &str = "IVA ASUMIDO";

/// Rebuild the item tables of a page from its text.
///
/// Consecutive item lines form one table; any other line closes it.
pub fn reconstruct_tables(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        match parse_item_line(line).or_else(|| parse_assumed_vat_line(line)) {
            Some(row) => current.push(row),
            None if !current.is_empty() => tables.push(std::mem::take(&mut current)),
            None => {}
        }
    }

    if !current.is_empty() {
        tables.push(current);
    }

    tables
}

/// Split on whitespace, gluing a lone `$` to the amount after it.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut currency = false;

    for token in line.split_whitespace() {
        if token == "$" {
            currency = true;
            continue;
        }
        if currency {
            tokens.push(format!("${}", token));
            currency = false;
        } else {
            tokens.push(token.to_string());
        }
    }

    tokens
}

fn is_numeric_token(token: &str) -> bool {
    let body = token.trim_start_matches('$').trim_end_matches('%');
    !body.is_empty()
        && body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
}

fn parse_item_line(line: &str) -> Option<Row> {
    let tokens = tokenize(line);
    if tokens.len() < ITEM_COLUMNS {
        return None;
    }
    if !tokens[0].chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let split = tokens.len() - TRAILING_NUMERIC;
    if !tokens[split..].iter().all(|t| is_numeric_token(t)) {
        return None;
    }

    let mut row: Row = Vec::with_capacity(ITEM_COLUMNS);
    row.push(Some(tokens[0].clone()));
    row.push(Some(tokens[1].clone()));
    row.push(Some(tokens[2..split - 1].join(" ")));
    row.push(Some(tokens[split - 1].clone()));
    row.extend(tokens[split..].iter().cloned().map(Some));
    Some(row)
}

fn parse_assumed_vat_line(line: &str) -> Option<Row> {
    if !line.contains(ASSUMED_VAT_MARKER) {
        return None;
    }

    let mut tokens = tokenize(line);
    let value = tokens.pop().filter(|t| is_numeric_token(t))?;
    let label = tokens.join(" ");

    Some(vec![
        None,
        None,
        None,
        Some(label),
        None,
        Some(value),
    ])
}
