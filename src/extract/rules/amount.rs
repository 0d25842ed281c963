//! Total-amount selection with self-consistency checks.
//!
//! OCR text mixes totals with subtotals, taxes, tips, change, unit
//! quantities, and card-authorization numbers, any of which can resemble a
//! dollar amount. The selector works through decreasing-confidence tiers
//! and cross-validates labeled totals against an independently computed
//! subtotal+tax reference.

use rust_decimal::Decimal;
use tracing::debug;

use crate::normalize::normalize_blob;

use super::money::{MoneyMatcher, MoneyToken};
use super::patterns::{contains_any, has_unit_trap, SUBTOTAL_LABELS, TAX_LABELS, TENDER_VOCAB, TOTAL_LABELS};
use super::FieldExtractor;

/// How the amount was decided. Confidence decreases monotonically down the
/// tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTier {
    /// Labeled total confirmed by the subtotal+tax reference.
    ConfirmedTotal,
    /// Labeled total without (or despite) a reference.
    LabeledTotal,
    /// Subtotal+tax reference used directly.
    ComputedReference,
    /// Largest plausible value in the bottom region.
    BottomFallback,
    /// Largest plausible value anywhere.
    AnywhereFallback,
    /// Nothing found.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmountPick {
    pub value: Decimal,
    pub confidence: f32,
    pub tier: AmountTier,
}

impl AmountPick {
    fn none() -> Self {
        Self {
            value: Decimal::ZERO,
            confidence: 0.0,
            tier: AmountTier::None,
        }
    }

    fn new(value: Decimal, confidence: f32, tier: AmountTier) -> Self {
        Self {
            value,
            confidence,
            tier,
        }
    }
}

/// Selects the receipt total from the bottom region of the line list.
pub struct AmountSelector {
    bottom_fraction: f32,
    labeled_ceiling: Decimal,
    fallback_ceiling: Decimal,
}

impl AmountSelector {
    pub fn new() -> Self {
        Self {
            bottom_fraction: 0.5,
            labeled_ceiling: Decimal::from(20_000u32),
            fallback_ceiling: Decimal::from(10_000u32),
        }
    }

    pub fn with_bottom_fraction(mut self, fraction: f32) -> Self {
        self.bottom_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_ceilings(mut self, labeled: u32, fallback: u32) -> Self {
        self.labeled_ceiling = Decimal::from(labeled);
        self.fallback_ceiling = Decimal::from(fallback);
        self
    }

    pub fn select(&self, lines: &[String]) -> AmountPick {
        if lines.is_empty() {
            return AmountPick::none();
        }

        let matcher = MoneyMatcher::new();
        let norms: Vec<String> = lines.iter().map(|l| normalize_blob(l)).collect();

        // Totals are printed near the end; short receipts are scanned whole.
        let start = if lines.len() >= 8 {
            (lines.len() as f32 * self.bottom_fraction) as usize
        } else {
            0
        };

        let reference = self.reference_total(lines, &norms, &matcher);
        let candidate = self.labeled_total(&lines[start..], &norms[start..], &matcher);
        debug!(?reference, ?candidate, "amount scan");

        match (candidate, reference) {
            (Some(c), Some(r)) => {
                if (c - r).abs() <= Decimal::new(5, 2) {
                    AmountPick::new(c, 0.96, AmountTier::ConfirmedTotal)
                } else if c > r * Decimal::from(10u32) {
                    // a wildly larger label value is OCR corruption
                    AmountPick::new(r, 0.90, AmountTier::ComputedReference)
                } else {
                    // printed totals legitimately exceed subtotal+tax when
                    // a tip or deposit line was added
                    AmountPick::new(c, 0.88, AmountTier::LabeledTotal)
                }
            }
            (Some(c), None) if c <= self.labeled_ceiling => {
                AmountPick::new(c, 0.90, AmountTier::LabeledTotal)
            }
            (None, Some(r)) => AmountPick::new(r, 0.90, AmountTier::ComputedReference),
            _ => self.fallback(lines, &norms, start, &matcher),
        }
    }

    /// Independently computed `subtotal + tax` reference, when both lines
    /// exist.
    fn reference_total(
        &self,
        lines: &[String],
        norms: &[String],
        matcher: &MoneyMatcher,
    ) -> Option<Decimal> {
        let mut subtotal = None;
        let mut tax = None;

        for (line, norm) in lines.iter().zip(norms) {
            if contains_any(norm, SUBTOTAL_LABELS) {
                if let Some(token) = rightmost(matcher.extract_all(line)) {
                    subtotal = Some(token.value);
                }
            } else if contains_any(norm, TAX_LABELS) {
                if let Some(token) = rightmost(matcher.extract_all(line)) {
                    tax = Some(token.value);
                }
            }
        }

        match (subtotal, tax) {
            (Some(s), Some(t)) => Some(s + t),
            _ => None,
        }
    }

    /// Bottom-up scan for an explicit total-style label, skipping tender
    /// and subtotal lines; unit-trap lines are admissible only through
    /// currency-marked tokens.
    fn labeled_total(
        &self,
        lines: &[String],
        norms: &[String],
        matcher: &MoneyMatcher,
    ) -> Option<Decimal> {
        for (line, norm) in lines.iter().zip(norms).rev() {
            if !contains_any(norm, TOTAL_LABELS) {
                continue;
            }
            if contains_any(norm, SUBTOTAL_LABELS) || contains_any(norm, TENDER_VOCAB) {
                continue;
            }
            let tokens = matcher.extract_all(line);
            let trapped = has_unit_trap(norm);
            let best = tokens
                .into_iter()
                .filter(|t| !trapped || t.marked)
                .map(|t| t.value)
                .max();
            if best.is_some() {
                return best;
            }
        }
        None
    }

    fn fallback(
        &self,
        lines: &[String],
        norms: &[String],
        start: usize,
        matcher: &MoneyMatcher,
    ) -> AmountPick {
        let regions = [
            (start, 0.74, AmountTier::BottomFallback),
            (0, 0.68, AmountTier::AnywhereFallback),
        ];
        for (from, confidence, tier) in regions {
            let best = lines[from..]
                .iter()
                .zip(&norms[from..])
                .filter(|(_, norm)| !contains_any(norm, TENDER_VOCAB))
                .filter(|(_, norm)| !contains_any(norm, SUBTOTAL_LABELS))
                .filter(|(_, norm)| !contains_any(norm, TAX_LABELS))
                .filter(|(_, norm)| !has_unit_trap(norm))
                .flat_map(|(line, _)| matcher.extract_all(line))
                .map(|t| t.value)
                .filter(|v| *v <= self.fallback_ceiling)
                .max();
            if let Some(value) = best {
                return AmountPick::new(value, confidence, tier);
            }
        }
        AmountPick::none()
    }
}

impl Default for AmountSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn rightmost(tokens: Vec<MoneyToken>) -> Option<MoneyToken> {
    tokens.into_iter().last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_self_consistency_confirms_total() {
        let pick = AmountSelector::new().select(&lines(&[
            "Subtotal: 30.74",
            "Tax: 1.85",
            "Total: 32.59",
        ]));
        assert_eq!(pick.value, Decimal::new(3259, 2));
        assert!(pick.confidence >= 0.95);
        assert_eq!(pick.tier, AmountTier::ConfirmedTotal);
    }

    #[test]
    fn test_unit_trap_rejected() {
        let pick = AmountSelector::new().select(&lines(&[
            "SHELL OIL",
            "UNLEADED 12.404 GAL",
            "TOTAL $38.72",
        ]));
        assert_eq!(pick.value, Decimal::new(3872, 2));
        assert!(pick.confidence >= 0.85);
    }

    #[test]
    fn test_subtotal_never_wins_over_explicit_total() {
        let pick = AmountSelector::new().select(&lines(&[
            "Subtotal 99.99",
            "Tax 8.00",
            "Total 107.99",
        ]));
        assert_eq!(pick.value, Decimal::new(10799, 2));
    }

    #[test]
    fn test_corrupt_total_falls_back_to_reference() {
        // a fused digit run on the total line is > 10x the reference
        let pick = AmountSelector::new().select(&lines(&[
            "Subtotal 30.74",
            "Tax 1.85",
            "Total 3259.32",
        ]));
        assert_eq!(pick.value, Decimal::new(3259, 2));
        assert_eq!(pick.tier, AmountTier::ComputedReference);
        assert!((pick.confidence - 0.90).abs() < 1e-6);
    }

    #[test]
    fn test_moderate_disagreement_keeps_label() {
        // tip lines push the printed total past subtotal+tax
        let pick = AmountSelector::new().select(&lines(&[
            "Subtotal 30.00",
            "Tax 2.00",
            "Total 38.00",
        ]));
        assert_eq!(pick.value, Decimal::new(3800, 2));
        assert_eq!(pick.tier, AmountTier::LabeledTotal);
    }

    #[test]
    fn test_reference_without_label() {
        let pick = AmountSelector::new().select(&lines(&[
            "Subtotal 30.74",
            "Sales Tax 1.85",
            "Thank you!",
        ]));
        assert_eq!(pick.value, Decimal::new(3259, 2));
        assert_eq!(pick.tier, AmountTier::ComputedReference);
    }

    #[test]
    fn test_tender_lines_excluded() {
        let pick = AmountSelector::new().select(&lines(&[
            "Total 25.00",
            "Cash 40.00",
            "Change 15.00",
        ]));
        assert_eq!(pick.value, Decimal::new(2500, 2));
    }

    #[test]
    fn test_fallback_to_largest_in_bottom() {
        let pick = AmountSelector::new().select(&lines(&[
            "WIDGET 4.99",
            "GADGET 12.49",
            "THING 3.25",
        ]));
        assert_eq!(pick.value, Decimal::new(1249, 2));
        assert_eq!(pick.tier, AmountTier::BottomFallback);
        assert!(pick.confidence < 0.80);
    }

    #[test]
    fn test_labeled_ceiling() {
        // an absurd labeled value with no reference is not trusted
        let pick = AmountSelector::new().select(&lines(&["Total 99999.00"]));
        assert_eq!(pick.tier, AmountTier::None);
        assert_eq!(pick.value, Decimal::ZERO);
    }

    #[test]
    fn test_empty_input() {
        let pick = AmountSelector::new().select(&[]);
        assert_eq!(pick.value, Decimal::ZERO);
        assert_eq!(pick.confidence, 0.0);
    }

    #[test]
    fn test_bottom_region_preferred_on_long_receipts() {
        let mut items: Vec<String> = (0..10).map(|i| format!("ITEM {} 1.0{}", i, i)).collect();
        items.push("GRAND TOTAL 18.45".to_string());
        let pick = AmountSelector::new().select(&items);
        assert_eq!(pick.value, Decimal::new(1845, 2));
        assert_eq!(pick.tier, AmountTier::LabeledTotal);
    }
}
