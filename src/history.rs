//! Past proposal records and the historical win-rate estimate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::PricingBreakdown;

/// Outcome value counted as a win by the rate estimate. Records may carry
/// other outcomes ("pending", "loss", ...); only this one scores.
pub const OUTCOME_WIN: &str = "win";

/// Default outcome for freshly saved proposals.
pub const OUTCOME_PENDING: &str = "pending";

/// Weights for blending the same-product and same-type win rates.
const WEIGHT_SAME_PRODUCT: f64 = 0.6;
const WEIGHT_SAME_TYPE: f64 = 0.4;

/// One persisted proposal. Append-only: records are never mutated after
/// creation and are only read back in aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    /// Epoch-millisecond id, monotonic for successive saves.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub tender_name: Option<String>,
    pub chosen_product_name: Option<String>,
    pub chosen_product_type: Option<String>,
    pub pricing: Option<PricingBreakdown>,
    pub quantity: u64,
    pub match_score: f64,
    pub outcome: String,
    /// Rendered one-line summary of the proposal.
    pub summary: Option<String>,
}

/// Blended historical win rate for a product.
///
/// Two groups are counted: records whose chosen product name matches
/// exactly, and records whose chosen product type matches exactly. Each
/// group's rate is wins/count, with an empty group contributing 0 rather
/// than dividing by zero. The blend is 0.6 same-product + 0.4 same-type.
pub fn blended_win_rate(records: &[ProposalRecord], product_name: &str, product_type: &str) -> f64 {
    let same_product = group_rate(records, |r| {
        r.chosen_product_name.as_deref() == Some(product_name)
    });
    let same_type = group_rate(records, |r| {
        r.chosen_product_type.as_deref() == Some(product_type)
    });
    WEIGHT_SAME_PRODUCT * same_product + WEIGHT_SAME_TYPE * same_type
}

fn group_rate(records: &[ProposalRecord], matches: impl Fn(&&ProposalRecord) -> bool) -> f64 {
    let group: Vec<&ProposalRecord> = records.iter().filter(matches).collect();
    if group.is_empty() {
        return 0.0;
    }
    let wins = group.iter().filter(|r| r.outcome == OUTCOME_WIN).count();
    wins as f64 / group.len() as f64
}
