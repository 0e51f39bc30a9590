//! Choosing one bid from a suggestion list under a margin constraint.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::recommend::BidSuggestion;

/// Pick the suggestion with the best expected win probability, preferring
/// those that meet the minimum profit margin.
///
/// Suggestions missing a margin get one backfilled from `base_price`
/// (zero when the base price is not positive). The margin constraint is
/// advisory: when nothing qualifies, the choice falls back to the full
/// list rather than failing. Ties keep the earliest suggestion.
///
/// Returns `None` only for an empty input list.
pub fn select_best(
    suggestions: &[BidSuggestion],
    base_price: Decimal,
    min_profit_pct: Decimal,
) -> Option<BidSuggestion> {
    let filled: Vec<BidSuggestion> = suggestions
        .iter()
        .map(|s| {
            let margin = s.profit_margin_pct.unwrap_or_else(|| {
                if base_price > Decimal::ZERO {
                    ((s.per_litre - base_price) / base_price * dec!(100)).round_dp(2)
                } else {
                    Decimal::ZERO
                }
            });
            BidSuggestion {
                profit_margin_pct: Some(margin),
                ..s.clone()
            }
        })
        .collect();

    let qualifying: Vec<&BidSuggestion> = filled
        .iter()
        .filter(|s| s.profit_margin_pct.unwrap_or(Decimal::ZERO) >= min_profit_pct)
        .collect();
    let all: Vec<&BidSuggestion> = filled.iter().collect();
    let candidates = if qualifying.is_empty() { &all } else { &qualifying };

    let mut best: Option<&BidSuggestion> = None;
    for &s in candidates.iter() {
        match best {
            Some(current) if s.expected_win_prob <= current.expected_win_prob => {}
            _ => best = Some(s),
        }
    }
    best.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suggestion(discount: Decimal, prob: f64, margin: Option<Decimal>) -> BidSuggestion {
        BidSuggestion {
            discount_pct: discount,
            per_litre: dec!(492) * (Decimal::ONE - discount / dec!(100)),
            total: dec!(49200),
            expected_win_prob: prob,
            profit_margin_pct: margin,
        }
    }

    #[test]
    fn picks_best_probability_among_qualifying() {
        let suggestions = vec![
            suggestion(dec!(0), 0.40, Some(dec!(23.0))),
            suggestion(dec!(2), 0.55, Some(dec!(20.5))),
            suggestion(dec!(5), 0.70, Some(dec!(16.9))),
        ];
        // Only the first two meet 20%; the 5% rung loses despite the best
        // probability.
        let best = select_best(&suggestions, dec!(400), dec!(20)).unwrap();
        assert_eq!(best.discount_pct, dec!(2));
    }

    #[test]
    fn falls_back_to_all_when_nothing_qualifies() {
        let suggestions = vec![
            suggestion(dec!(0), 0.40, Some(dec!(5.0))),
            suggestion(dec!(5), 0.70, Some(dec!(1.0))),
        ];
        let best = select_best(&suggestions, dec!(400), dec!(50)).unwrap();
        assert_eq!(best.discount_pct, dec!(5));
    }

    #[test]
    fn backfills_missing_margins_from_base_price() {
        let suggestions = vec![suggestion(dec!(0), 0.40, None)];
        let best = select_best(&suggestions, dec!(400), Decimal::ZERO).unwrap();
        // (492 - 400) / 400 = 23%.
        assert_eq!(best.profit_margin_pct, Some(dec!(23.00)));
    }

    #[test]
    fn zero_base_price_backfills_zero_margin() {
        let suggestions = vec![suggestion(dec!(0), 0.40, None)];
        let best = select_best(&suggestions, Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(best.profit_margin_pct, Some(Decimal::ZERO));
    }

    #[test]
    fn ties_keep_input_order() {
        let suggestions = vec![
            suggestion(dec!(1), 0.70, Some(dec!(10))),
            suggestion(dec!(2), 0.70, Some(dec!(10))),
        ];
        let best = select_best(&suggestions, dec!(400), Decimal::ZERO).unwrap();
        assert_eq!(best.discount_pct, dec!(1));
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(select_best(&[], dec!(400), Decimal::ZERO), None);
    }
}
