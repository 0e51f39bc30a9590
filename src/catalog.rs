//! Catalog products as loosely-typed attribute maps.
//!
//! Catalog rows arrive from user-supplied CSV files, so field names vary in
//! casing and spelling. Instead of duplicating every key under multiple
//! casings, each logical attribute has an ordered alias table consulted with
//! case-insensitive key comparison; the first alias present wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accepted field names per logical attribute, in priority order.
pub const NAME_FIELDS: &[&str] = &["name"];
pub const TYPE_FIELDS: &[&str] = &["type"];
pub const FINISH_FIELDS: &[&str] = &["finish"];
pub const VOC_FIELDS: &[&str] = &["voc"];
pub const COVERAGE_FIELDS: &[&str] = &["coverage"];
pub const PACK_FIELDS: &[&str] = &["pack"];

/// Price-per-litre field variants seen in supplier catalogs.
pub const PRICE_FIELDS: &[&str] = &[
    "price_per_litre",
    "price_per_ltr",
    "price_per_l",
    "price",
    "price_per_litre_inr",
];

/// One catalog product: an ordered attribute map keyed by the original
/// (trimmed) header names. Read-only during scoring and pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product {
    fields: BTreeMap<String, Value>,
}

impl Product {
    /// Build a product from `(key, value)` pairs. Keys are trimmed; later
    /// duplicates of the same trimmed key overwrite earlier ones.
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_string(), v))
                .collect(),
        }
    }

    /// Look up a single field by case-insensitive key comparison.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// First alias present in the map, rendered as a display string.
    /// Missing, null, and non-scalar values read as empty.
    pub fn text(&self, aliases: &[&str]) -> String {
        for alias in aliases {
            if let Some(value) = self.get(alias) {
                let text = scalar_to_string(value);
                if !text.is_empty() {
                    return text;
                }
            }
        }
        String::new()
    }

    /// Like [`Product::text`], but trimmed and lower-cased for substring
    /// matching against tender text.
    pub fn normalized(&self, aliases: &[&str]) -> String {
        self.text(aliases).trim().to_lowercase()
    }

    /// First alias that parses as a non-negative number. Unparseable and
    /// negative values read as absent, never as an error.
    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        for alias in aliases {
            if let Some(value) = self.get(alias) {
                if let Some(n) = scalar_to_number(value) {
                    if n >= 0.0 {
                        return Some(n);
                    }
                }
            }
        }
        None
    }

    /// The product's display name.
    pub fn name(&self) -> String {
        self.text(NAME_FIELDS)
    }

    /// The product's category/type string.
    pub fn product_type(&self) -> String {
        self.text(TYPE_FIELDS)
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn scalar_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Product {
        Product::from_fields([
            ("Name", json!("WeatherShield Max")),
            ("Type", json!("emulsion")),
            ("finish", json!("matte")),
            ("VOC", json!("low")),
            ("Coverage", json!(120)),
            ("price_per_litre", json!("400")),
        ])
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let p = sample();
        assert_eq!(p.text(TYPE_FIELDS), "emulsion");
        assert_eq!(p.text(VOC_FIELDS), "low");
        assert_eq!(p.name(), "WeatherShield Max");
    }

    #[test]
    fn first_present_price_alias_wins() {
        let p = Product::from_fields([
            ("price", json!(999)),
            ("price_per_litre", json!(400)),
        ]);
        // price_per_litre outranks price in the alias table.
        assert_eq!(p.number(PRICE_FIELDS), Some(400.0));
    }

    #[test]
    fn numeric_strings_parse() {
        let p = sample();
        assert_eq!(p.number(COVERAGE_FIELDS), Some(120.0));
        assert_eq!(p.number(PRICE_FIELDS), Some(400.0));
    }

    #[test]
    fn bad_and_negative_numbers_read_as_absent() {
        let p = Product::from_fields([("coverage", json!("plenty"))]);
        assert_eq!(p.number(COVERAGE_FIELDS), None);

        let p = Product::from_fields([("coverage", json!(-5))]);
        assert_eq!(p.number(COVERAGE_FIELDS), None);
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let p = Product::default();
        assert_eq!(p.text(FINISH_FIELDS), "");
        assert_eq!(p.number(PRICE_FIELDS), None);
    }

    #[test]
    fn serde_round_trip_is_transparent() {
        let p = sample();
        let encoded = serde_json::to_string(&p).unwrap();
        let decoded: Product = serde_json::from_str(&encoded).unwrap();
        assert_eq!(p, decoded);
        // Transparent representation: just the map, no wrapper object.
        assert!(encoded.starts_with('{'));
        assert!(encoded.contains("WeatherShield Max"));
    }
}
