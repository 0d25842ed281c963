//! Result records handed back to the UI/workflow collaborator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending category taxonomy.
///
/// A small closed set; `Other` is the universal fallback and carries the
/// lowest default confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Fuel,
    Meals,
    #[serde(rename = "Materials / Supplies")]
    Materials,
    #[serde(rename = "Tools & Equipment")]
    Tools,
    #[serde(rename = "Vehicle Maintenance")]
    VehicleMaintenance,
    #[serde(rename = "Office / Admin")]
    Office,
    Subcontractors,
    #[serde(rename = "Permits / Fees")]
    PermitsFees,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 9] = [
        Category::Fuel,
        Category::Meals,
        Category::Materials,
        Category::Tools,
        Category::VehicleMaintenance,
        Category::Office,
        Category::Subcontractors,
        Category::PermitsFees,
        Category::Other,
    ];

    /// Human-readable label; matches the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fuel => "Fuel",
            Category::Meals => "Meals",
            Category::Materials => "Materials / Supplies",
            Category::Tools => "Tools & Equipment",
            Category::VehicleMaintenance => "Vehicle Maintenance",
            Category::Office => "Office / Admin",
            Category::Subcontractors => "Subcontractors",
            Category::PermitsFees => "Permits / Fees",
            Category::Other => "Other",
        }
    }

    /// Parse a category from its display label.
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Category::ALL.iter().copied().find(|c| c.label() == s)
    }

    /// Default chart-of-accounts code for exports.
    pub fn account_code(&self) -> &'static str {
        match self {
            Category::Fuel => "6000",
            Category::Tools => "6100",
            Category::Materials => "6200",
            Category::VehicleMaintenance => "6300",
            Category::Meals => "6400",
            Category::Office => "6500",
            Category::Subcontractors => "6600",
            Category::PermitsFees => "6700",
            Category::Other => "6999",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured fields recovered from one receipt's OCR text.
///
/// Invariants: every confidence is in `[0.0, 1.0]`, and an absent field
/// (empty vendor, `None` date, zero amount) always carries confidence 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Best vendor guess. Empty when no candidate survived filtering.
    pub vendor: String,

    /// Up to three alternative vendor strings for UI display.
    pub vendor_candidates: Vec<String>,

    /// Confidence in the vendor guess (0.0 - 1.0).
    pub vendor_confidence: f32,

    /// Transaction date, when a plausible one was found.
    pub date: Option<NaiveDate>,

    /// Confidence in the date (0.0 - 1.0).
    pub date_confidence: f32,

    /// Total amount; zero when unknown.
    pub amount: Decimal,

    /// Confidence in the amount (0.0 - 1.0).
    pub amount_confidence: f32,

    /// Weighted combination of the per-field confidences.
    pub parse_confidence: f32,
}

impl ExtractionResult {
    /// The fully-unknown result: all fields absent, all confidences 0.0.
    pub fn empty() -> Self {
        Self {
            vendor: String::new(),
            vendor_candidates: Vec::new(),
            vendor_confidence: 0.0,
            date: None,
            date_confidence: 0.0,
            amount: Decimal::ZERO,
            amount_confidence: 0.0,
            parse_confidence: 0.0,
        }
    }

    /// ISO `YYYY-MM-DD` form of the date; empty string when absent.
    pub fn date_string(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Category decision for one receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizationResult {
    /// Assigned spending category.
    pub category: Category,

    /// Confidence in the category (0.0 - 1.0).
    pub confidence: f32,

    /// Short human-readable reasons; deduplicated, capped at four,
    /// never empty.
    pub reasons: Vec<String>,

    /// True when the category came from learned vendor memory.
    pub from_memory: bool,
}

impl CategorizationResult {
    /// Memory-sourced results are safe for the workflow to auto-approve.
    pub fn auto_approvable(&self) -> bool {
        self.from_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_label(cat.label()), Some(cat));
        }
        assert_eq!(Category::from_label("  Fuel  "), Some(Category::Fuel));
        assert_eq!(Category::from_label("Groceries"), None);
    }

    #[test]
    fn test_category_serde_uses_labels() {
        let json = serde_json::to_string(&Category::Materials).unwrap();
        assert_eq!(json, "\"Materials / Supplies\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Materials);
    }

    #[test]
    fn test_account_codes_are_distinct() {
        let mut codes: Vec<&str> = Category::ALL.iter().map(|c| c.account_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Category::ALL.len());
    }

    #[test]
    fn test_empty_extraction_has_zero_confidence() {
        let ex = ExtractionResult::empty();
        assert!(ex.vendor.is_empty());
        assert_eq!(ex.date, None);
        assert_eq!(ex.amount, Decimal::ZERO);
        assert_eq!(ex.parse_confidence, 0.0);
        assert_eq!(ex.date_string(), "");
    }
}
