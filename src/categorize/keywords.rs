//! Keyword-scoring fallback tier.
//!
//! Confidence here is about category certainty, built from independent
//! receipt-quality signals plus a per-hit bonus, clamped to a fixed band.

use crate::extract::rules::patterns::{contains_any, contains_phrase, TOTAL_LABELS};
use crate::extract::rules::{DateMatcher, FieldExtractor, MoneyMatcher};
use crate::memory::VendorStore;
use crate::models::{CategorizationResult, Category};

use super::{CategoryTier, ClassifyContext};

/// Per-category keyword vocabularies for the fallback scorer.
pub static CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Fuel,
        &["fuel", "gas", "gasoline", "unleaded", "diesel", "pump", "gallon", "gallons"],
    ),
    (
        Category::Meals,
        &[
            "coffee", "latte", "burger", "sandwich", "lunch", "dinner", "breakfast", "menu",
            "taco", "pizza", "server", "table", "dine",
        ],
    ),
    (
        Category::Materials,
        &[
            "lumber", "paint", "drywall", "concrete", "supply", "supplies", "materials",
            "hardware", "fasteners", "plumbing", "electrical",
        ],
    ),
    (
        Category::Tools,
        &["tool", "tools", "drill", "saw", "blade", "rental", "equipment", "compressor", "generator"],
    ),
    (
        Category::VehicleMaintenance,
        &["tire", "tires", "brake", "brakes", "alignment", "filter", "battery", "wiper", "coolant"],
    ),
    (
        Category::Office,
        &["paper", "ink", "toner", "postage", "shipping", "envelope", "folders", "software"],
    ),
    (
        Category::Subcontractors,
        &["labor", "contractor", "subcontractor", "crew", "install", "installation"],
    ),
    (
        Category::PermitsFees,
        &["permit", "inspection", "license", "filing", "recording", "township", "borough", "municipal"],
    ),
];

const CONFIDENCE_FLOOR: f32 = 0.35;
const CONFIDENCE_CEILING: f32 = 0.92;
const SIGNAL_BONUS: f32 = 0.07;
const HIT_BONUS: f32 = 0.06;
const MAX_COUNTED_HITS: usize = 3;

/// Tier 3: keyword hit counting. Always produces a result, so the
/// classifier chain is total.
pub struct KeywordTier;

impl CategoryTier for KeywordTier {
    fn name(&self) -> &'static str {
        "keywords"
    }

    fn classify(
        &self,
        ctx: &ClassifyContext,
        _memory: &dyn VendorStore,
    ) -> Option<CategorizationResult> {
        let mut signals = 0usize;
        let mut signal_reasons: Vec<String> = Vec::new();

        let has_total = ctx.lines.iter().any(|l| contains_any(l, TOTAL_LABELS));
        note(&mut signals, &mut signal_reasons, has_total, "Found a TOTAL-like label", "No total label found");

        let has_date = ctx
            .raw_lines
            .iter()
            .any(|l| DateMatcher::new().extract(l).is_some());
        note(&mut signals, &mut signal_reasons, has_date, "Found a date pattern", "No clear date pattern");

        let has_money = ctx
            .raw_lines
            .iter()
            .any(|l| MoneyMatcher::new().extract(l).is_some());
        note(&mut signals, &mut signal_reasons, has_money, "Found a currency amount", "No currency amounts found");

        let has_vendor = !ctx.vendor_norm.is_empty();
        note(&mut signals, &mut signal_reasons, has_vendor, "Vendor name present", "No vendor detected");

        let (category, hits) = best_category(&ctx.blob);

        let mut reasons;
        let confidence;
        if hits == 0 {
            reasons = vec!["No category keywords matched".to_string()];
            confidence = CONFIDENCE_FLOOR;
        } else {
            reasons = vec![format!(
                "Keyword match for {} ({} hit{})",
                category.label(),
                hits,
                if hits == 1 { "" } else { "s" }
            )];
            confidence = (CONFIDENCE_FLOOR
                + SIGNAL_BONUS * signals as f32
                + HIT_BONUS * hits.min(MAX_COUNTED_HITS) as f32)
                .clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);
        }
        reasons.extend(signal_reasons);

        Some(CategorizationResult {
            category: if hits == 0 { Category::Other } else { category },
            confidence,
            reasons,
            from_memory: false,
        })
    }
}

fn note(signals: &mut usize, reasons: &mut Vec<String>, present: bool, yes: &str, no: &str) {
    if present {
        *signals += 1;
        reasons.push(yes.to_string());
    } else {
        reasons.push(no.to_string());
    }
}

/// Count distinct keyword hits per category over the vendor+text blob; the
/// category with the most hits wins, earlier table entries breaking ties.
fn best_category(blob: &str) -> (Category, usize) {
    let mut best = (Category::Other, 0usize);
    for (category, keywords) in CATEGORY_KEYWORDS {
        let hits = keywords
            .iter()
            .filter(|k| contains_phrase(blob, k))
            .count();
        if hits > best.1 {
            best = (*category, hits);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryVendorStore;

    fn classify(text: &str, vendor: &str) -> CategorizationResult {
        let ctx = ClassifyContext::new(text, vendor);
        KeywordTier.classify(&ctx, &InMemoryVendorStore::new()).unwrap()
    }

    #[test]
    fn test_zero_hits_is_other_at_floor() {
        let result = classify("", "");
        assert_eq!(result.category, Category::Other);
        assert_eq!(result.confidence, CONFIDENCE_FLOOR);
        assert!(result.reasons.iter().any(|r| r.contains("No category keywords")));
    }

    #[test]
    fn test_fuel_keywords_win() {
        let result = classify("UNLEADED FUEL PUMP 4\nTOTAL $38.72\n03/14/2024", "");
        assert_eq!(result.category, Category::Fuel);
        assert!(result.confidence > CONFIDENCE_FLOOR);
        assert!(result.reasons.iter().any(|r| r.contains("Keyword match for Fuel")));
    }

    #[test]
    fn test_quality_signals_raise_confidence() {
        let bare = classify("fuel", "");
        let rich = classify("FUEL\nTOTAL $38.72\n03/14/2024", "SHELL");
        assert!(rich.confidence > bare.confidence);
    }

    #[test]
    fn test_confidence_stays_in_band() {
        let result = classify(
            "fuel gas gasoline unleaded diesel pump gallon gallons\nTOTAL $9.99\n01/02/2024",
            "SHELL",
        );
        assert!(result.confidence <= CONFIDENCE_CEILING);
        assert!(result.confidence >= CONFIDENCE_FLOOR);
    }

    #[test]
    fn test_tie_breaks_by_table_order() {
        // one hit each for Fuel and Meals; Fuel sits earlier in the table
        let result = classify("diesel lunch", "");
        assert_eq!(result.category, Category::Fuel);
    }
}
