//! Fixed-layout proposal document rendering.
//!
//! Produces an A4 PDF with the sections a submission needs: header,
//! issuer details (when supplied), tender excerpt, product detail table,
//! commercial bid table, declaration text, and a signature block. Layout is
//! a simple top-down text flow with automatic page breaks.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::bidding::BidSuggestion;
use crate::catalog::{
    COVERAGE_FIELDS, FINISH_FIELDS, PACK_FIELDS, Product, TYPE_FIELDS, VOC_FIELDS,
};
use crate::error::RenderError;
use crate::pricing::PricingBreakdown;

/// A4 in PDF points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 54.0;

/// Tender excerpts are clipped to keep the document a summary.
const EXCERPT_MAX_CHARS: usize = 4000;

/// Characters per wrapped body line at the body font size.
const WRAP_WIDTH: usize = 92;

/// Column offset for table values.
const VALUE_COLUMN: f32 = 200.0;

/// Issuer identification printed on a full submission. All fields are
/// required; the request layer validates before rendering.
#[derive(Debug, Clone)]
pub struct IssuerDetails {
    pub name: String,
    pub address: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
}

/// Everything a proposal document is rendered from.
pub struct ProposalContext<'a> {
    pub title: &'a str,
    pub tender_excerpt: &'a str,
    pub product: &'a Product,
    pub pricing: &'a PricingBreakdown,
    pub suggestion: &'a BidSuggestion,
    pub issuer: Option<&'a IssuerDetails>,
}

/// Render the proposal as PDF bytes.
pub fn render_proposal_pdf(
    ctx: &ProposalContext<'_>,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    let mut flow = TextFlow::new();

    flow.title(ctx.title);
    flow.body(&format!(
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M")
    ));
    flow.gap(8.0);

    if let Some(issuer) = ctx.issuer {
        flow.heading("Issuer Details");
        flow.kv("Company", &issuer.name);
        flow.kv("Address", &issuer.address);
        flow.kv("Contact", &issuer.contact_person);
        flow.kv("Email", &issuer.email);
        flow.kv("Phone", &issuer.phone);
        flow.gap(8.0);
    }

    flow.heading("Tender Summary (Extracted)");
    let excerpt: String = ctx.tender_excerpt.chars().take(EXCERPT_MAX_CHARS).collect();
    for raw_line in excerpt.lines() {
        for line in wrap(raw_line, WRAP_WIDTH) {
            flow.body(&line);
        }
    }
    flow.gap(8.0);

    flow.heading("Selected Product & Technical Details");
    flow.kv("Name", &ctx.product.name());
    flow.kv("Type", &ctx.product.text(TYPE_FIELDS));
    flow.kv("Finish", &ctx.product.text(FINISH_FIELDS));
    flow.kv("VOC", &ctx.product.text(VOC_FIELDS));
    flow.kv("Pack", &ctx.product.text(PACK_FIELDS));
    flow.kv("Coverage", &non_empty_or(&ctx.product.text(COVERAGE_FIELDS), "N/A"));
    flow.gap(8.0);

    flow.heading("Commercial Bid - Selected");
    flow.kv("Discount %", &ctx.suggestion.discount_pct.to_string());
    flow.kv("Per Litre (final)", &ctx.suggestion.per_litre.to_string());
    flow.kv("Quantity (L)", &ctx.pricing.quantity.to_string());
    flow.kv("Total", &ctx.suggestion.total.to_string());
    flow.kv(
        "Expected Win Probability",
        &format!("{:.3}", ctx.suggestion.expected_win_prob),
    );
    flow.kv(
        "Profit Margin % (approx)",
        &ctx.suggestion
            .profit_margin_pct
            .map(|m| m.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    flow.gap(12.0);

    flow.heading("Declaration & Terms");
    for line in [
        "Prices are valid for 30 days from submission.",
        "Delivery as per tender schedule; lead time to be confirmed post-order.",
        "Payment terms: as per tender / negotiated.",
        "This document is auto-generated.",
    ] {
        flow.body(line);
    }
    flow.gap(18.0);

    let issuer_name = ctx
        .issuer
        .map(|i| i.name.as_str())
        .unwrap_or("___________________");
    flow.body(&format!("For: {issuer_name}"));
    flow.gap(18.0);
    flow.body("Authorized Signatory: ____________________");

    build_pdf(flow.finish())
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Top-down text flow across pages.
struct TextFlow {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl TextFlow {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn title(&mut self, text: &str) {
        self.write(16.0, "F2", MARGIN, text);
        self.y -= 6.0;
    }

    fn heading(&mut self, text: &str) {
        self.write(12.0, "F2", MARGIN, text);
    }

    fn body(&mut self, text: &str) {
        self.write(10.0, "F1", MARGIN, text);
    }

    /// A two-column table row: bold label, value at a fixed column.
    fn kv(&mut self, label: &str, value: &str) {
        let size = 10.0;
        self.ensure_room(size + 4.0);
        self.current.extend(text_ops("F2", size, MARGIN, self.y, label));
        self.current
            .extend(text_ops("F1", size, VALUE_COLUMN, self.y, value));
        self.y -= size + 4.0;
    }

    fn gap(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn write(&mut self, size: f32, font: &str, x: f32, text: &str) {
        self.ensure_room(size + 4.0);
        self.current.extend(text_ops(font, size, x, self.y, text));
        self.y -= size + 4.0;
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            let finished = std::mem::take(&mut self.current);
            self.pages.push(finished);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.current);
        self.pages
    }
}

fn text_ops(font: &str, size: f32, x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(latin_safe(text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Replace characters the base-font encoding cannot represent.
fn latin_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Greedy word wrap; words longer than the width get their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Assemble the page contents into a PDF document.
fn build_pdf(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, RenderError> {
    let pdf_err = |e: lopdf::Error| RenderError::Pdf {
        reason: e.to_string(),
    };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_regular,
            "F2" => font_bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let stream = Stream::new(dictionary! {}, content.encode().map_err(pdf_err)?);
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), (PAGE_HEIGHT as i64).into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e: std::io::Error| RenderError::Pdf {
        reason: e.to_string(),
    })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn context_parts() -> (Product, PricingBreakdown, BidSuggestion) {
        let product = Product::from_fields([
            ("name", json!("WeatherShield Max")),
            ("type", json!("emulsion")),
            ("finish", json!("matte")),
            ("voc", json!("low")),
            ("pack", json!("20L drum")),
            ("coverage", json!(120)),
            ("price_per_litre", json!(400)),
        ]);
        let breakdown = pricing::estimate(&product, 8000, None);
        let suggestion = BidSuggestion {
            discount_pct: dec!(2.0),
            per_litre: breakdown.final_per_litre_after_discount,
            total: breakdown.total_cost,
            expected_win_prob: 0.512,
            profit_margin_pct: Some(dec!(20.54)),
        };
        (product, breakdown, suggestion)
    }

    #[test]
    fn renders_a_parseable_pdf() {
        let (product, breakdown, suggestion) = context_parts();
        let issuer = IssuerDetails {
            name: "Apex Coatings Pvt Ltd".to_string(),
            address: "14 Industrial Estate, Pune".to_string(),
            contact_person: "R. Iyer".to_string(),
            email: "bids@apexcoatings.example".to_string(),
            phone: "+91 98765 43210".to_string(),
        };
        let ctx = ProposalContext {
            title: "Final Tender Submission",
            tender_excerpt: "Exterior emulsion, matte finish, low VOC, 8000 Litres",
            product: &product,
            pricing: &breakdown,
            suggestion: &suggestion,
            issuer: Some(&issuer),
        };

        let bytes = render_proposal_pdf(&ctx, Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // The output must be loadable by the same library that reads
        // uploaded tenders.
        let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn long_excerpts_paginate() {
        let (product, breakdown, suggestion) = context_parts();
        let long_excerpt = "Specification line for the tender document.\n".repeat(120);
        let ctx = ProposalContext {
            title: "Auto Proposal",
            tender_excerpt: &long_excerpt,
            product: &product,
            pricing: &breakdown,
            suggestion: &suggestion,
            issuer: None,
        };

        let bytes = render_proposal_pdf(&ctx, Utc::now()).unwrap();
        let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(reloaded.get_pages().len() > 1);
    }

    #[test]
    fn non_ascii_is_replaced_not_fatal() {
        let (product, breakdown, suggestion) = context_parts();
        let ctx = ProposalContext {
            title: "Proposal — ₹ pricing",
            tender_excerpt: "emulsion",
            product: &product,
            pricing: &breakdown,
            suggestion: &suggestion,
            issuer: None,
        };
        assert!(render_proposal_pdf(&ctx, Utc::now()).is_ok());
    }
}
