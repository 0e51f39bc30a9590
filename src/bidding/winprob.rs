//! Win-probability estimate for a bid.
//!
//! A weighted blend of match quality, price competitiveness, and historical
//! outcome rate, damped and perturbed by a small uniform jitter. The jitter
//! source is injectable so callers that need determinism (tests, replayed
//! scenarios) can pin it.

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Blend weights over the three inputs.
pub const WEIGHT_MATCH: f64 = 0.5;
pub const WEIGHT_PRICE: f64 = 0.3;
pub const WEIGHT_HISTORY: f64 = 0.2;

/// Damping applied to the raw blend before the jitter is added.
pub const DAMPING: f64 = 0.95;

/// Upper bound (exclusive) of the uniform jitter.
pub const JITTER_SPAN: f64 = 0.05;

/// Competitiveness assigned when no baseline total is available.
const NEUTRAL_COMPETITIVENESS: f64 = 0.5;

/// Source of the bounded random perturbation.
pub trait Jitter: Send + Sync {
    /// A value in [0, JITTER_SPAN).
    fn sample(&self) -> f64;
}

/// Production jitter: uniform over [0, JITTER_SPAN).
#[derive(Debug, Default)]
pub struct UniformJitter;

impl Jitter for UniformJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..JITTER_SPAN)
    }
}

/// Deterministic jitter for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Combine match score, price competitiveness, and historical win rate into
/// a probability in [0, 1].
pub fn win_probability(
    match_score: f64,
    price_competitiveness: f64,
    historical_win_rate: f64,
    jitter: &dyn Jitter,
) -> f64 {
    let raw = WEIGHT_MATCH * match_score
        + WEIGHT_PRICE * price_competitiveness
        + WEIGHT_HISTORY * historical_win_rate;
    (raw * DAMPING + jitter.sample()).clamp(0.0, 1.0)
}

/// Price competitiveness of our total against a baseline (competitor or
/// reference) total.
///
/// Undercutting is rewarded on a 0.7..1.0 band; overbidding decays from 0.7
/// to a floor of 0. Without a usable baseline the estimate is neutral (0.5).
pub fn price_competitiveness(our_total: Decimal, baseline_total: Decimal) -> f64 {
    if baseline_total <= Decimal::ZERO {
        return NEUTRAL_COMPETITIVENESS;
    }
    let ours = our_total.to_f64().unwrap_or(0.0);
    let baseline = baseline_total.to_f64().unwrap_or(0.0);
    if baseline <= 0.0 {
        return NEUTRAL_COMPETITIVENESS;
    }

    let ratio = ours / baseline;
    if ratio <= 1.0 {
        0.7 + 0.3 * (1.0 - ratio)
    } else {
        (0.7 - 0.7 * (ratio - 1.0)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn probability_stays_in_jitter_band() {
        // With a live jitter, the result must land in
        // [raw * DAMPING, raw * DAMPING + JITTER_SPAN), clamped.
        let raw = WEIGHT_MATCH * 0.6 + WEIGHT_PRICE * 0.8 + WEIGHT_HISTORY * 0.25;
        for _ in 0..50 {
            let p = win_probability(0.6, 0.8, 0.25, &UniformJitter);
            assert!(p >= raw * DAMPING - 1e-12);
            assert!(p < raw * DAMPING + JITTER_SPAN);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn fixed_jitter_makes_it_exact() {
        let p = win_probability(1.0, 1.0, 1.0, &FixedJitter(0.0));
        assert!((p - DAMPING).abs() < 1e-12);

        // Saturated inputs plus max jitter clamp to 1.
        let p = win_probability(1.0, 1.0, 1.0, &FixedJitter(JITTER_SPAN));
        assert_eq!(p, 1.0);
    }

    #[test]
    fn undercutting_raises_competitiveness() {
        // At par: 0.7.
        assert!((price_competitiveness(dec!(100), dec!(100)) - 0.7).abs() < 1e-12);
        // 20% under: 0.7 + 0.3 * 0.2.
        assert!((price_competitiveness(dec!(80), dec!(100)) - 0.76).abs() < 1e-12);
        // Halved: approaching the top of the band.
        assert!(price_competitiveness(dec!(50), dec!(100)) > 0.8);
    }

    #[test]
    fn overbidding_decays_to_zero() {
        assert!((price_competitiveness(dec!(110), dec!(100)) - 0.63).abs() < 1e-12);
        // Double the baseline: floored at 0.
        assert_eq!(price_competitiveness(dec!(200), dec!(100)), 0.0);
    }

    #[test]
    fn missing_baseline_is_neutral() {
        assert_eq!(price_competitiveness(dec!(100), Decimal::ZERO), 0.5);
        assert_eq!(price_competitiveness(dec!(100), dec!(-5)), 0.5);
    }
}
