//! Needs-review policy.
//!
//! A pure threshold comparison over already-computed values; the same
//! function must be used wherever a record's review state is displayed or
//! recomputed.

use rust_decimal::Decimal;

use crate::models::config::ReviewPolicy;
use crate::models::{CategorizationResult, ExtractionResult};

/// A record requires human review when the overall parse confidence falls
/// below the configured floor, any critical field is absent, or the
/// categorization confidence is low.
///
/// A 0.0-confidence field is equivalent to "absent" here - never a literal
/// zero value.
pub fn needs_review(
    extraction: &ExtractionResult,
    categorization: &CategorizationResult,
    policy: &ReviewPolicy,
) -> bool {
    if extraction.parse_confidence < policy.parse_confidence_floor {
        return true;
    }
    if extraction.vendor.trim().is_empty() {
        return true;
    }
    if extraction.date.is_none() {
        return true;
    }
    if extraction.amount <= Decimal::ZERO {
        return true;
    }
    categorization.confidence < policy.category_confidence_floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn good_extraction() -> ExtractionResult {
        ExtractionResult {
            vendor: "SHELL OIL".to_string(),
            vendor_candidates: Vec::new(),
            vendor_confidence: 0.9,
            date: NaiveDate::from_ymd_opt(2024, 3, 14),
            date_confidence: 0.95,
            amount: Decimal::new(3872, 2),
            amount_confidence: 0.9,
            parse_confidence: 0.91,
        }
    }

    fn good_categorization() -> CategorizationResult {
        CategorizationResult {
            category: Category::Fuel,
            confidence: 0.9,
            reasons: vec!["Vendor matched 'shell'".to_string()],
            from_memory: false,
        }
    }

    #[test]
    fn test_confident_record_skips_review() {
        assert!(!needs_review(
            &good_extraction(),
            &good_categorization(),
            &ReviewPolicy::default()
        ));
    }

    #[test]
    fn test_missing_fields_force_review() {
        let policy = ReviewPolicy::default();

        let mut ex = good_extraction();
        ex.vendor.clear();
        assert!(needs_review(&ex, &good_categorization(), &policy));

        let mut ex = good_extraction();
        ex.date = None;
        assert!(needs_review(&ex, &good_categorization(), &policy));

        let mut ex = good_extraction();
        ex.amount = Decimal::ZERO;
        assert!(needs_review(&ex, &good_categorization(), &policy));
    }

    #[test]
    fn test_low_parse_confidence_forces_review() {
        let mut ex = good_extraction();
        ex.parse_confidence = 0.1;
        assert!(needs_review(&ex, &good_categorization(), &ReviewPolicy::default()));
    }

    #[test]
    fn test_low_category_confidence_forces_review() {
        let mut cat = good_categorization();
        cat.confidence = 0.35;
        assert!(needs_review(&good_extraction(), &cat, &ReviewPolicy::default()));
    }

    #[test]
    fn test_threshold_is_tunable() {
        let mut ex = good_extraction();
        ex.parse_confidence = 0.5;
        let strict = ReviewPolicy {
            parse_confidence_floor: 0.8,
            ..ReviewPolicy::default()
        };
        assert!(needs_review(&ex, &good_categorization(), &strict));
        assert!(!needs_review(&ex, &good_categorization(), &ReviewPolicy::default()));
    }
}
