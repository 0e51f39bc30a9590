//! Request and response DTOs for the HTTP API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bidding::{BidSuggestion, Recommendation};
use crate::catalog::Product;
use crate::history::ProposalRecord;
use crate::matching::MatchResult;
use crate::pricing::PricingBreakdown;
use crate::render::IssuerDetails;

// --- Health ---

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

// --- Catalog ---

#[derive(Debug, Serialize)]
pub struct UploadProductsResponse {
    pub message: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

// --- Tender processing ---

#[derive(Debug, Serialize)]
pub struct ProcessTenderResponse {
    /// Extracted text, clipped for transport.
    pub extracted_text: String,
    /// Quantity in litres recovered from the text (0 when absent).
    pub quantity: u64,
    /// Ranked matches, best first.
    pub matches: Vec<MatchResult>,
    /// The best match, when the catalog is non-empty.
    pub chosen: Option<MatchResult>,
    /// One-line auto-summary for the chosen product.
    pub summary: Option<String>,
}

// --- Bid recommendation ---

#[derive(Debug, Deserialize)]
pub struct RecommendBidRequest {
    pub product_name: String,
    #[serde(default)]
    pub quantity: u64,
    /// Competitor/reference total; zero or negative means none.
    #[serde(default)]
    pub baseline_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RecommendBidResponse {
    pub recommendation: Recommendation,
}

// --- Proposal rendering ---

/// The chosen match a quick draft is rendered from; shaped like the
/// `chosen` entry of [`ProcessTenderResponse`].
#[derive(Debug, Deserialize)]
pub struct DraftChoice {
    pub product: Product,
    pub pricing: PricingBreakdown,
}

#[derive(Debug, Deserialize)]
pub struct DraftProposalRequest {
    #[serde(default)]
    pub tender_name: Option<String>,
    #[serde(default)]
    pub extracted_text: String,
    pub chosen: Option<DraftChoice>,
}

/// Issuer details as submitted; every field is required for a full
/// submission and validated before rendering.
#[derive(Debug, Default, Deserialize)]
pub struct IssuerInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl IssuerInput {
    /// Check completeness, reporting every missing field by name.
    pub fn validate(self) -> Result<IssuerDetails, Vec<&'static str>> {
        let mut missing = Vec::new();
        let take = |field: Option<String>, name, missing: &mut Vec<&'static str>| match field {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                missing.push(name);
                None
            }
        };

        let name = take(self.name, "name", &mut missing);
        let address = take(self.address, "address", &mut missing);
        let contact_person = take(self.contact_person, "contact_person", &mut missing);
        let email = take(self.email, "email", &mut missing);
        let phone = take(self.phone, "phone", &mut missing);

        if missing.is_empty() {
            // All five are Some here by construction.
            Ok(IssuerDetails {
                name: name.unwrap_or_default(),
                address: address.unwrap_or_default(),
                contact_person: contact_person.unwrap_or_default(),
                email: email.unwrap_or_default(),
                phone: phone.unwrap_or_default(),
            })
        } else {
            Err(missing)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FinalProposalRequest {
    #[serde(default)]
    pub tender_name: Option<String>,
    #[serde(default)]
    pub tender_summary: String,
    pub chosen_product: Product,
    #[serde(default)]
    pub pricing: Option<PricingBreakdown>,
    /// When absent, suggestions are recomputed server-side from the
    /// catalog product.
    #[serde(default)]
    pub suggestions: Vec<BidSuggestion>,
    #[serde(default)]
    pub min_profit_pct: Decimal,
    #[serde(default)]
    pub issuer: IssuerInput,
}

// --- Proposal history ---

#[derive(Debug, Deserialize)]
pub struct SaveProposalRequest {
    #[serde(default)]
    pub tender_name: Option<String>,
    #[serde(default)]
    pub chosen_product_name: Option<String>,
    #[serde(default)]
    pub chosen_product_type: Option<String>,
    #[serde(default)]
    pub pricing: Option<PricingBreakdown>,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveProposalResponse {
    pub message: &'static str,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalRecord>,
}
