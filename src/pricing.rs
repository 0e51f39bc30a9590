//! Layered unit pricing: base price + logistics + tax, volume discount,
//! quantity total.
//!
//! Every derived monetary value is rounded to 2 decimal places as it is
//! computed, so downstream consumers (recommendations, rendered documents)
//! see exactly the figures the estimator used.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::{PRICE_FIELDS, Product};

/// GST applied on the base price.
pub const GST_PCT: Decimal = dec!(18.0);

/// Volume discount granted at or above [`VOLUME_DISCOUNT_MIN_QTY`] litres.
pub const VOLUME_DISCOUNT_PCT: Decimal = dec!(2.0);
pub const VOLUME_DISCOUNT_MIN_QTY: u64 = 2000;

/// Flat logistics fee used when the base price is unknown and no city fee
/// applies.
const LOGISTICS_FLAT_FALLBACK: Decimal = dec!(20.0);

/// Logistics share of the base price when the delivery city is not in the
/// fee table.
const LOGISTICS_BASE_SHARE: Decimal = dec!(0.05);

/// Per-litre pricing breakdown at a given quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub base_price: Decimal,
    pub logistics: Decimal,
    pub tax: Decimal,
    pub final_per_litre_before_discount: Decimal,
    pub discount_pct: Decimal,
    pub final_per_litre_after_discount: Decimal,
    pub quantity: u64,
    pub total_cost: Decimal,
}

/// Flat delivery fee per litre for cities we ship to regularly.
fn city_logistics_fee(city: &str) -> Option<Decimal> {
    let fee = match city {
        "bengaluru" | "bangalore" => dec!(18.0),
        "delhi" => dec!(30.0),
        "mumbai" => dec!(25.0),
        "hyderabad" => dec!(20.0),
        "chennai" => dec!(22.0),
        "kolkata" => dec!(28.0),
        _ => return None,
    };
    Some(fee)
}

/// Base price per litre: the first price alias that parses as a
/// non-negative number, else zero.
pub fn base_price(product: &Product) -> Decimal {
    product
        .number(PRICE_FIELDS)
        .and_then(Decimal::from_f64_retain)
        .unwrap_or(Decimal::ZERO)
}

/// Estimate the full pricing breakdown for a product at a quantity, with an
/// optional delivery city for the logistics lookup.
///
/// Pure and deterministic: identical inputs always produce an identical
/// breakdown.
pub fn estimate(product: &Product, quantity: u64, city: Option<&str>) -> PricingBreakdown {
    let base = base_price(product).round_dp(2);

    let logistics = city
        .map(|c| c.trim().to_lowercase())
        .and_then(|c| city_logistics_fee(&c))
        .unwrap_or_else(|| {
            if base > Decimal::ZERO {
                (base * LOGISTICS_BASE_SHARE).round_dp(2)
            } else {
                LOGISTICS_FLAT_FALLBACK
            }
        });

    let tax = (base * GST_PCT / dec!(100)).round_dp(2);
    let final_before = (base + logistics + tax).round_dp(2);

    let discount_pct = if quantity >= VOLUME_DISCOUNT_MIN_QTY {
        VOLUME_DISCOUNT_PCT
    } else {
        Decimal::ZERO
    };

    let final_after = (final_before * (Decimal::ONE - discount_pct / dec!(100))).round_dp(2);
    let total_cost = (final_after * Decimal::from(quantity)).round_dp(2);

    PricingBreakdown {
        base_price: base,
        logistics,
        tax,
        final_per_litre_before_discount: final_before,
        discount_pct,
        final_per_litre_after_discount: final_after,
        quantity,
        total_cost,
    }
}
