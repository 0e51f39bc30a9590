//! Bid suggestions across the fixed discount ladder.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::history::{ProposalRecord, blended_win_rate};
use crate::matching::round3;
use crate::pricing::{self, PricingBreakdown};

use super::winprob::{Jitter, price_competitiveness, win_probability};

/// Discount levels quoted to the bidder. These are alternatives to the
/// volume discount, not stacked on top of it: each level is applied to the
/// per-litre price *before* the volume discount.
pub const DISCOUNT_LEVELS: [Decimal; 5] = [dec!(0.0), dec!(1.0), dec!(2.0), dec!(3.0), dec!(5.0)];

/// Match-score baseline used for a product that has already been
/// shortlisted; the recommender does not re-run the scorer.
pub const SHORTLIST_MATCH_SCORE: f64 = 0.6;

/// One quoted bid at a discount level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidSuggestion {
    pub discount_pct: Decimal,
    pub per_litre: Decimal,
    pub total: Decimal,
    /// Rounded to 3 decimal places.
    pub expected_win_prob: f64,
    /// Absent only on externally supplied suggestions; the selector
    /// backfills it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_margin_pct: Option<Decimal>,
}

/// The bid we would place with no extra discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentBid {
    pub per_litre: Decimal,
    pub total: Decimal,
    pub expected_win_prob: f64,
}

/// Full recommendation for one product and quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub current: CurrentBid,
    pub suggestions: Vec<BidSuggestion>,
    /// Blended historical win rate, rounded to 3 decimal places.
    pub historical_win_rate: f64,
    pub pricing_base: PricingBreakdown,
}

/// Produce the discount-ladder suggestions for a product.
///
/// `baseline_total` is an externally supplied competitor/reference total;
/// zero or negative means "none", in which case competitiveness stays at
/// the neutral current estimate for every level.
pub fn recommend(
    product: &Product,
    tender_quantity: u64,
    baseline_total: Decimal,
    history: &[ProposalRecord],
    jitter: &dyn Jitter,
) -> Recommendation {
    let pricing = pricing::estimate(product, tender_quantity, None);

    let current_competitiveness = price_competitiveness(pricing.total_cost, baseline_total);
    let historical = blended_win_rate(history, &product.name(), &product.product_type());
    let current_prob = win_probability(
        SHORTLIST_MATCH_SCORE,
        current_competitiveness,
        historical,
        jitter,
    );

    let quantity = Decimal::from(tender_quantity);
    let suggestions = DISCOUNT_LEVELS
        .iter()
        .map(|&discount| {
            let per_litre = (pricing.final_per_litre_before_discount
                * (Decimal::ONE - discount / dec!(100)))
            .round_dp(2);
            let total = (per_litre * quantity).round_dp(2);

            let margin = if pricing.base_price > Decimal::ZERO {
                ((per_litre - pricing.base_price) / pricing.base_price * dec!(100)).round_dp(2)
            } else {
                Decimal::ZERO
            };

            let competitiveness = if baseline_total > Decimal::ZERO {
                price_competitiveness(total, baseline_total)
            } else {
                current_competitiveness
            };
            let prob = win_probability(SHORTLIST_MATCH_SCORE, competitiveness, historical, jitter);

            BidSuggestion {
                discount_pct: discount,
                per_litre,
                total,
                expected_win_prob: round3(prob),
                profit_margin_pct: Some(margin),
            }
        })
        .collect();

    Recommendation {
        current: CurrentBid {
            per_litre: pricing.final_per_litre_after_discount,
            total: pricing.total_cost,
            expected_win_prob: round3(current_prob),
        },
        suggestions,
        historical_win_rate: round3(historical),
        pricing_base: pricing,
    }
}
