//! Turning uploads into usable data: catalog CSV files and tender
//! documents.

use serde_json::Value;

use crate::catalog::Product;
use crate::error::ExtractError;

/// Parse an uploaded delimited catalog file into products.
///
/// Each record becomes an attribute map keyed by the trimmed header names;
/// empty cells are skipped so absent attributes read as unknown rather than
/// empty strings.
pub fn parse_catalog_csv(bytes: &[u8]) -> Result<Vec<Product>, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut products = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header, Value::String(cell.to_string())));
        products.push(Product::from_fields(fields));
    }
    Ok(products)
}

/// Extract plain text from an uploaded tender document.
///
/// PDFs are read per page with `lopdf`; anything else is accepted as
/// pre-extracted text when it decodes as UTF-8. Failures surface as a
/// client-facing extraction error, never a crash.
pub fn extract_document_text(bytes: &[u8]) -> Result<String, ExtractError> {
    if bytes.starts_with(b"%PDF") {
        return extract_pdf_text(bytes);
    }
    String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::UnsupportedDocument)
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Pdf {
        reason: e.to_string(),
    })?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    document
        .extract_text(&pages)
        .map_err(|e| ExtractError::Pdf {
            reason: e.to_string(),
        })
}
