//! End-to-end engine scenario: one catalog product against a realistic
//! tender, through extraction, scoring, pricing, recommendation, and
//! selection, all in memory with no store or HTTP involved.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use tenderbid::bidding::{self, FixedJitter};
use tenderbid::catalog::Product;
use tenderbid::extract::SignalExtractor;
use tenderbid::matching;
use tenderbid::pricing;

const TENDER_TEXT: &str =
    "Exterior emulsion, matte finish, low VOC, 8000 Litres, coverage 120 sqft";

fn catalog_product() -> Product {
    Product::from_fields([
        ("name", json!("X")),
        ("type", json!("emulsion")),
        ("finish", json!("matte")),
        ("voc", json!("low")),
        ("coverage", json!(120)),
        ("price", json!(400)),
    ])
}

#[test]
fn exterior_emulsion_tender_end_to_end() {
    let signals = SignalExtractor::new();
    let product = catalog_product();

    // Quantity comes straight out of the text.
    let quantity = signals.quantity(TENDER_TEXT);
    assert_eq!(quantity, 8000);

    // All four rubric terms are satisfied; coverage matches exactly.
    let score = matching::score_product(&signals, &product, TENDER_TEXT);
    assert_eq!(score, 1.0);
    assert_eq!(
        matching::compute_gaps(&signals, &product, TENDER_TEXT),
        Vec::<String>::new()
    );

    // Layered pricing with city-absent logistics (5% of base).
    let breakdown = pricing::estimate(&product, quantity, None);
    assert_eq!(breakdown.base_price, dec!(400.00));
    assert_eq!(breakdown.logistics, dec!(20.00));
    assert_eq!(breakdown.tax, dec!(72.00));
    assert_eq!(breakdown.final_per_litre_before_discount, dec!(492.00));
    assert_eq!(breakdown.discount_pct, dec!(2.0));
    assert_eq!(breakdown.final_per_litre_after_discount, dec!(482.16));
    assert_eq!(breakdown.total_cost, dec!(3857280.00));

    // Estimation is pure: a second run is byte-identical.
    assert_eq!(breakdown, pricing::estimate(&product, quantity, None));

    // A ranked run puts the product first with the same numbers.
    let ranked = matching::rank_catalog(&signals, &[product.clone()], TENDER_TEXT, quantity);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].score, 1.0);
    assert_eq!(ranked[0].pricing, breakdown);

    // Recommendation ladder off the pre-volume-discount price.
    let rec = bidding::recommend(&product, quantity, Decimal::ZERO, &[], &FixedJitter(0.0));
    assert_eq!(rec.suggestions.len(), 5);
    assert_eq!(rec.suggestions[0].per_litre, dec!(492.00));
    assert_eq!(rec.suggestions[4].per_litre, dec!(467.40));
    assert_eq!(rec.current.per_litre, dec!(482.16));
    assert_eq!(rec.current.total, dec!(3857280.00));
    assert_eq!(rec.historical_win_rate, 0.0);

    // Selection under an unreachable margin still chooses a bid.
    let best = bidding::select_best(&rec.suggestions, breakdown.base_price, dec!(99)).unwrap();
    assert!(
        rec.suggestions
            .iter()
            .all(|s| s.profit_margin_pct.unwrap() < dec!(99))
    );
    assert!(
        rec.suggestions
            .iter()
            .all(|s| s.expected_win_prob <= best.expected_win_prob)
    );
}

#[test]
fn volume_discount_boundary_feeds_the_ladder() {
    let product = catalog_product();

    let below = pricing::estimate(&product, 1999, None);
    assert_eq!(below.discount_pct, Decimal::ZERO);
    assert_eq!(below.final_per_litre_after_discount, dec!(492.00));

    let at = pricing::estimate(&product, 2000, None);
    assert_eq!(at.discount_pct, dec!(2.0));
    assert_eq!(at.final_per_litre_after_discount, dec!(482.16));

    // The ladder is an alternative to the volume discount, so its rungs
    // are identical on both sides of the boundary.
    let rec_below = bidding::recommend(&product, 1999, Decimal::ZERO, &[], &FixedJitter(0.0));
    let rec_at = bidding::recommend(&product, 2000, Decimal::ZERO, &[], &FixedJitter(0.0));
    let rungs = |r: &bidding::Recommendation| {
        r.suggestions.iter().map(|s| s.per_litre).collect::<Vec<_>>()
    };
    assert_eq!(rungs(&rec_below), rungs(&rec_at));
}

#[test]
fn win_probability_band_holds_with_live_jitter() {
    let product = catalog_product();
    // competitiveness 0.5 (no baseline), history 0, shortlist score 0.6:
    // raw = 0.45, damped = 0.4275.
    let damped = 0.45 * 0.95;
    for _ in 0..25 {
        let rec = bidding::recommend(
            &product,
            100,
            Decimal::ZERO,
            &[],
            &bidding::UniformJitter,
        );
        // Reported probabilities are rounded to 3 dp, so allow half a ulp
        // of that rounding on each side of the jitter band.
        for s in &rec.suggestions {
            assert!(s.expected_win_prob >= damped - 5e-4);
            assert!(s.expected_win_prob <= damped + 0.05 + 5e-4);
        }
    }
}
