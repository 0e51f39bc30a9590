//! HTTP handlers.
//!
//! Handlers stay thin: decode the request, snapshot state through the
//! store, call the pure engine, encode the response. Bad uploads and
//! incomplete requests are 4xx with actionable detail, internal failures
//! are 500s, and nothing panics.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::bidding::{self, BidSuggestion};
use crate::catalog::Product;
use crate::history::{OUTCOME_PENDING, ProposalRecord};
use crate::ingest;
use crate::matching;
use crate::pricing;
use crate::render::{self, ProposalContext};

use super::AppState;
use super::types::*;

/// Extracted-text preview cap on tender processing responses.
const EXTRACTED_TEXT_PREVIEW_CHARS: usize = 8000;

type HandlerError = (StatusCode, String);

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

// --- Catalog ---

pub async fn upload_products(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadProductsResponse>, HandlerError> {
    let bytes = first_file_bytes(multipart).await?;
    let products = ingest::parse_catalog_csv(&bytes)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let count = state
        .store
        .replace_products(products)
        .await
        .map_err(internal)?;
    tracing::info!(count, "Catalog replaced");

    Ok(Json(UploadProductsResponse {
        message: "Products uploaded",
        count,
    }))
}

pub async fn list_products(State(state): State<Arc<AppState>>) -> Json<ProductListResponse> {
    Json(ProductListResponse {
        products: state.store.products().await,
    })
}

// --- Tender processing ---

pub async fn process_tender(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProcessTenderResponse>, HandlerError> {
    let bytes = first_file_bytes(multipart).await?;
    let text =
        ingest::extract_document_text(&bytes).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let quantity = state.signals.quantity(&text);
    let products = state.store.products().await;
    let matches = matching::rank_catalog(&state.signals, &products, &text, quantity);

    let chosen = matches.first().cloned();
    let summary = chosen
        .as_ref()
        .map(|c| format!("Auto-proposal for {}", c.product.name()));

    Ok(Json(ProcessTenderResponse {
        extracted_text: text.chars().take(EXTRACTED_TEXT_PREVIEW_CHARS).collect(),
        quantity,
        matches,
        chosen,
        summary,
    }))
}

// --- Bid recommendation ---

pub async fn recommend_bid(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendBidRequest>,
) -> Result<Json<RecommendBidResponse>, HandlerError> {
    if req.product_name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "product_name required".to_string()));
    }

    let products = state.store.products().await;
    let product = find_product(&products, &req.product_name).ok_or((
        StatusCode::NOT_FOUND,
        format!("Product '{}' not found", req.product_name),
    ))?;

    let history = state.store.proposals().await;
    let recommendation = bidding::recommend(
        product,
        req.quantity,
        req.baseline_total,
        &history,
        state.jitter.as_ref(),
    );

    Ok(Json(RecommendBidResponse { recommendation }))
}

// --- Proposal rendering ---

pub async fn draft_proposal(
    Json(req): Json<DraftProposalRequest>,
) -> Result<Response, HandlerError> {
    let chosen = req.chosen.ok_or((
        StatusCode::BAD_REQUEST,
        "No chosen product in payload".to_string(),
    ))?;

    // The draft quotes the volume-discount pricing as-is; no extra
    // discount, neutral win probability.
    let pricing = &chosen.pricing;
    let margin = if pricing.base_price > Decimal::ZERO {
        ((pricing.final_per_litre_after_discount - pricing.base_price) / pricing.base_price
            * Decimal::from(100))
        .round_dp(2)
    } else {
        Decimal::ZERO
    };
    let suggestion = BidSuggestion {
        discount_pct: pricing.discount_pct,
        per_litre: pricing.final_per_litre_after_discount,
        total: pricing.total_cost,
        expected_win_prob: 0.5,
        profit_margin_pct: Some(margin),
    };

    let title = req.tender_name.as_deref().unwrap_or("Auto Proposal");
    let ctx = ProposalContext {
        title,
        tender_excerpt: &req.extracted_text,
        product: &chosen.product,
        pricing,
        suggestion: &suggestion,
        issuer: None,
    };
    let bytes = render::render_proposal_pdf(&ctx, Utc::now()).map_err(internal)?;
    Ok(pdf_response(
        format!("proposal_{}.pdf", Utc::now().timestamp()),
        bytes,
    ))
}

pub async fn final_proposal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FinalProposalRequest>,
) -> Result<Response, HandlerError> {
    let issuer = req.issuer.validate().map_err(|missing| {
        (
            StatusCode::BAD_REQUEST,
            format!("Missing required issuer field(s): {}", missing.join(", ")),
        )
    })?;

    // Suggestions may come from the client; otherwise recompute them from
    // the cataloged product at the submitted pricing.
    let (suggestions, base_pricing) = if req.suggestions.is_empty() {
        let products = state.store.products().await;
        let product = find_product(&products, &req.chosen_product.name()).ok_or((
            StatusCode::BAD_REQUEST,
            "Product not found for suggestion generation".to_string(),
        ))?;

        let (quantity, baseline) = req
            .pricing
            .as_ref()
            .map(|p| (p.quantity, p.total_cost))
            .unwrap_or((0, Decimal::ZERO));
        let history = state.store.proposals().await;
        let rec = bidding::recommend(product, quantity, baseline, &history, state.jitter.as_ref());
        (rec.suggestions, rec.pricing_base)
    } else {
        let base_pricing = req
            .pricing
            .clone()
            .unwrap_or_else(|| pricing::estimate(&req.chosen_product, 0, None));
        (req.suggestions, base_pricing)
    };

    let best = bidding::select_best(&suggestions, base_pricing.base_price, req.min_profit_pct)
        .ok_or((
            StatusCode::BAD_REQUEST,
            "No bid suggestions to select from".to_string(),
        ))?;

    let title = req.tender_name.as_deref().unwrap_or("Final Tender Submission");
    let ctx = ProposalContext {
        title,
        tender_excerpt: &req.tender_summary,
        product: &req.chosen_product,
        pricing: &base_pricing,
        suggestion: &best,
        issuer: Some(&issuer),
    };
    let bytes = render::render_proposal_pdf(&ctx, Utc::now()).map_err(internal)?;
    Ok(pdf_response(
        format!("final_tender_{}.pdf", Utc::now().timestamp()),
        bytes,
    ))
}

// --- Proposal history ---

pub async fn save_proposal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveProposalRequest>,
) -> Result<Json<SaveProposalResponse>, HandlerError> {
    let now = Utc::now();
    let record = ProposalRecord {
        id: now.timestamp_millis(),
        timestamp: now,
        tender_name: req.tender_name,
        chosen_product_name: req.chosen_product_name,
        chosen_product_type: req.chosen_product_type,
        pricing: req.pricing,
        quantity: req.quantity,
        match_score: req.match_score,
        outcome: req.outcome.unwrap_or_else(|| OUTCOME_PENDING.to_string()),
        summary: req.summary,
    };

    let id = state.store.append_proposal(record).await.map_err(internal)?;
    Ok(Json(SaveProposalResponse { message: "Saved", id }))
}

pub async fn list_proposals(State(state): State<Arc<AppState>>) -> Json<ProposalListResponse> {
    Json(ProposalListResponse {
        proposals: state.store.proposals().await,
    })
}

// --- Helpers ---

/// Pull the first uploaded file out of a multipart body.
async fn first_file_bytes(mut multipart: Multipart) -> Result<Vec<u8>, HandlerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Malformed upload: {e}")))?
    {
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Unreadable upload: {e}")))?;
        if !bytes.is_empty() {
            return Ok(bytes.to_vec());
        }
    }
    Err((
        StatusCode::BAD_REQUEST,
        "Expected a file field in the upload".to_string(),
    ))
}

/// Catalog lookup: exact (normalized) name match first, then substring.
fn find_product<'a>(products: &'a [Product], name: &str) -> Option<&'a Product> {
    let wanted = name.trim().to_lowercase();
    products
        .iter()
        .find(|p| p.name().trim().to_lowercase() == wanted)
        .or_else(|| {
            products
                .iter()
                .find(|p| p.name().to_lowercase().contains(&wanted))
        })
}

fn pdf_response(filename: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn internal(err: impl std::fmt::Display) -> HandlerError {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: &str) -> Product {
        Product::from_fields([("name", json!(name))])
    }

    #[test]
    fn exact_name_match_beats_substring() {
        let products = vec![named("WeatherShield Max Ultra"), named("WeatherShield Max")];
        let found = find_product(&products, "weathershield max").unwrap();
        assert_eq!(found.name(), "WeatherShield Max");
    }

    #[test]
    fn substring_fallback_applies() {
        let products = vec![named("WeatherShield Max")];
        let found = find_product(&products, "Shield").unwrap();
        assert_eq!(found.name(), "WeatherShield Max");
    }

    #[test]
    fn unknown_product_is_none() {
        let products = vec![named("WeatherShield Max")];
        assert!(find_product(&products, "Tractor Emulsion").is_none());
    }
}
