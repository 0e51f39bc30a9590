//! Requirement-signal extraction from raw tender text.
//!
//! Tender documents are free text; the signals we need (quantity, coverage,
//! finish, VOC class) are recovered with fixed, ordered pattern rules. The
//! patterns are compiled once into a [`SignalExtractor`] and shared. All
//! matching is case-insensitive and only the first textual match of each
//! pattern is used. Failures are never errors; a signal that cannot be
//! recovered simply reads as absent.

use regex::Regex;

/// Finish keywords scanned for in priority order; the first one found in the
/// tender text is taken as the required finish.
pub const FINISH_KEYWORDS: &[&str] = &["matte", "smooth", "satin", "gloss", "semi-gloss", "semi gloss"];

/// VOC-class keywords scanned for in priority order.
pub const VOC_KEYWORDS: &[&str] = &["ultra-low", "ultra low", "low", "medium", "high"];

/// Compiled extraction patterns.
pub struct SignalExtractor {
    /// Number (with optional comma/space grouping) followed by a litre unit.
    quantity_litres: Regex,
    /// Number (with optional grouping) after a "qty"/"quantity" label.
    quantity_label: Regex,
    /// Coverage after an explicit "coverage" label.
    coverage_label: Regex,
    /// Coverage as a number followed by an area unit.
    coverage_area: Regex,
}

impl SignalExtractor {
    pub fn new() -> Self {
        // Patterns are fixed string literals; compilation cannot fail.
        Self {
            quantity_litres: Regex::new(
                r"(?i)(\d{1,3}(?:[, ]\d{3})+|\d{2,7})\s*(?:litres|litre|ltr|ltrs|l)\b",
            )
            .unwrap(),
            quantity_label: Regex::new(r"(?i)(?:qty|quantity)\s*[:\-]?\s*(\d{1,7}(?:[, ]\d{3})*)")
                .unwrap(),
            coverage_label: Regex::new(r"coverage[:\s]*([0-9]{2,4})").unwrap(),
            coverage_area: Regex::new(r"([0-9]{2,4})\s*(?:sqft|sq ft|sqf|sqm|sq m|sq\.ft|sq\.m)")
                .unwrap(),
        }
    }

    /// Extract the tendered quantity in litres.
    ///
    /// Tries a litre-unit pattern first ("8000 Litres", "8,000 L"), then a
    /// labelled pattern ("Qty: 8000", "Quantity - 8,000"). Grouping commas
    /// and spaces are stripped before parsing. Returns 0 when neither
    /// pattern matches or the digits fail to parse.
    pub fn quantity(&self, text: &str) -> u64 {
        for pattern in [&self.quantity_litres, &self.quantity_label] {
            if let Some(caps) = pattern.captures(text) {
                let digits: String = caps[1].chars().filter(char::is_ascii_digit).collect();
                if let Ok(qty) = digits.parse() {
                    return qty;
                }
            }
        }
        0
    }

    /// Coverage value for scoring: the labelled form ("coverage: 120")
    /// outranks the area-unit form ("120 sqft"). Expects lower-cased text.
    pub fn scoring_coverage(&self, tender: &str) -> Option<f64> {
        self.coverage_label
            .captures(tender)
            .or_else(|| self.coverage_area.captures(tender))
            .and_then(|caps| caps[1].parse().ok())
    }

    /// Coverage value for gap analysis: only the area-unit form counts.
    /// Expects lower-cased text.
    pub fn gap_coverage(&self, tender: &str) -> Option<f64> {
        self.coverage_area
            .captures(tender)
            .and_then(|caps| caps[1].parse().ok())
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// First finish keyword present in the (lower-cased) tender text.
pub fn required_finish(tender: &str) -> Option<&'static str> {
    FINISH_KEYWORDS.iter().copied().find(|kw| tender.contains(kw))
}

/// First VOC keyword present in the (lower-cased) tender text.
pub fn required_voc(tender: &str) -> Option<&'static str> {
    VOC_KEYWORDS.iter().copied().find(|kw| tender.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quantity_with_litre_unit() {
        let ex = SignalExtractor::new();
        assert_eq!(ex.quantity("supply of 800 Litres of paint"), 800);
        assert_eq!(ex.quantity("8,000 litres required"), 8000);
        assert_eq!(ex.quantity("12 000 LTR"), 12000);
    }

    #[test]
    fn quantity_with_label() {
        let ex = SignalExtractor::new();
        assert_eq!(ex.quantity("Quantity: 8,000"), 8000);
        assert_eq!(ex.quantity("qty - 2500"), 2500);
        assert_eq!(ex.quantity("QUANTITY 400"), 400);
    }

    #[test]
    fn litre_pattern_outranks_label() {
        let ex = SignalExtractor::new();
        // Both patterns match; the unit-qualified number wins.
        assert_eq!(ex.quantity("Qty: 99, total 5000 litres"), 5000);
    }

    #[test]
    fn quantity_absent_reads_as_zero() {
        let ex = SignalExtractor::new();
        assert_eq!(ex.quantity("no number here"), 0);
        assert_eq!(ex.quantity(""), 0);
    }

    #[test]
    fn scoring_coverage_prefers_label() {
        let ex = SignalExtractor::new();
        assert_eq!(ex.scoring_coverage("coverage: 130, area 90 sqft"), Some(130.0));
        assert_eq!(ex.scoring_coverage("spread of 90 sqft per litre"), Some(90.0));
        assert_eq!(ex.scoring_coverage("nothing relevant"), None);
    }

    #[test]
    fn gap_coverage_ignores_label_form() {
        let ex = SignalExtractor::new();
        assert_eq!(ex.gap_coverage("coverage: 130"), None);
        assert_eq!(ex.gap_coverage("120 sq m per coat"), Some(120.0));
    }

    #[test]
    fn finish_priority_order() {
        assert_eq!(required_finish("needs a matte or satin look"), Some("matte"));
        // "semi-gloss" text hits the earlier "gloss" keyword first.
        assert_eq!(required_finish("semi-gloss finish"), Some("gloss"));
        assert_eq!(required_finish("no finish named"), None);
    }

    #[test]
    fn voc_priority_order() {
        assert_eq!(required_voc("ultra-low voc emulsion"), Some("ultra-low"));
        assert_eq!(required_voc("low voc emulsion"), Some("low"));
        assert_eq!(required_voc("nothing"), None);
    }
}
