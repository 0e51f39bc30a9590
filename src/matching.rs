//! Scoring catalog products against tender text.
//!
//! The rubric is a fixed weighted sum over four signals. Type, finish, and
//! VOC award their full weight iff the product's normalized attribute value
//! appears verbatim in the tender text; coverage is scaled by how close the
//! product's coverage is to the tender's. Gap detection is independent of
//! the score and produces human-readable mismatch descriptions.

use serde::{Deserialize, Serialize};

use crate::catalog::{COVERAGE_FIELDS, FINISH_FIELDS, Product, TYPE_FIELDS, VOC_FIELDS};
use crate::extract::{SignalExtractor, required_finish, required_voc};
use crate::pricing::{self, PricingBreakdown};

/// Rubric weights. They sum to 1.0, which keeps the raw score in [0, 1].
pub const WEIGHT_TYPE: f64 = 0.40;
pub const WEIGHT_FINISH: f64 = 0.20;
pub const WEIGHT_VOC: f64 = 0.15;
pub const WEIGHT_COVERAGE: f64 = 0.25;

/// Relative coverage difference tolerated before a gap is reported.
pub const COVERAGE_GAP_TOLERANCE: f64 = 0.15;

/// How many ranked matches a tender run returns.
pub const TOP_MATCHES: usize = 6;

/// One scored catalog product for a tender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub product: Product,
    /// Rubric score, rounded to 3 decimal places.
    pub score: f64,
    /// Human-readable mismatch descriptions, in detection order.
    pub gaps: Vec<String>,
    pub pricing: PricingBreakdown,
}

/// Score one product against tender text. Deterministic, clamped to [0, 1].
pub fn score_product(signals: &SignalExtractor, product: &Product, tender_text: &str) -> f64 {
    let tender = tender_text.to_lowercase();
    let mut score = 0.0;

    let p_type = product.normalized(TYPE_FIELDS);
    if !p_type.is_empty() && tender.contains(&p_type) {
        score += WEIGHT_TYPE;
    }

    let p_finish = product.normalized(FINISH_FIELDS);
    if !p_finish.is_empty() && tender.contains(&p_finish) {
        score += WEIGHT_FINISH;
    }

    let p_voc = product.normalized(VOC_FIELDS);
    if !p_voc.is_empty() && tender.contains(&p_voc) {
        score += WEIGHT_VOC;
    }

    if let Some(tender_cov) = signals.scoring_coverage(&tender) {
        if let Some(prod_cov) = product.number(COVERAGE_FIELDS).filter(|c| *c > 0.0) {
            let max_cov = tender_cov.max(prod_cov).max(1.0);
            let closeness = (1.0 - (tender_cov - prod_cov).abs() / max_cov).max(0.0);
            score += WEIGHT_COVERAGE * closeness;
        }
    }

    score.clamp(0.0, 1.0)
}

/// Detect requirement/attribute mismatches, independent of the score.
///
/// A requirement that cannot be read out of the tender text is skipped
/// silently; only positive mismatches are reported.
pub fn compute_gaps(signals: &SignalExtractor, product: &Product, tender_text: &str) -> Vec<String> {
    let tender = tender_text.to_lowercase();
    let mut gaps = Vec::new();

    let p_finish = product.normalized(FINISH_FIELDS);
    if let Some(required) = required_finish(&tender) {
        if !p_finish.is_empty() && !p_finish.contains(required) {
            gaps.push(format!(
                "Finish mismatch: tender requires '{required}', product has '{p_finish}'"
            ));
        }
    }

    let p_voc = product.normalized(VOC_FIELDS);
    if let Some(required) = required_voc(&tender) {
        if !p_voc.is_empty() && !p_voc.contains(required) {
            gaps.push(format!(
                "VOC mismatch: tender requires '{required}', product has '{p_voc}'"
            ));
        }
    }

    if let Some(tender_cov) = signals.gap_coverage(&tender) {
        match product.number(COVERAGE_FIELDS).filter(|c| *c > 0.0) {
            None => gaps.push("Product coverage not specified".to_string()),
            Some(prod_cov) => {
                let diff = (tender_cov - prod_cov).abs() / tender_cov.max(prod_cov);
                if diff > COVERAGE_GAP_TOLERANCE {
                    gaps.push(format!(
                        "Coverage diff: tender {tender_cov} vs product {prod_cov} ({:.1}%)",
                        diff * 100.0
                    ));
                }
            }
        }
    }

    gaps
}

/// Score the whole catalog against a tender and keep the best matches.
///
/// Results are priced at the extracted quantity, sorted by score descending
/// and capped at [`TOP_MATCHES`].
pub fn rank_catalog(
    signals: &SignalExtractor,
    products: &[Product],
    tender_text: &str,
    quantity: u64,
) -> Vec<MatchResult> {
    let mut scored: Vec<(f64, &Product)> = products
        .iter()
        .map(|p| (score_product(signals, p, tender_text), p))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(TOP_MATCHES)
        .map(|(score, product)| MatchResult {
            score: round3(score),
            gaps: compute_gaps(signals, product, tender_text),
            pricing: pricing::estimate(product, quantity, None),
            product: product.clone(),
        })
        .collect()
}

/// Round to 3 decimal places for reporting.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
