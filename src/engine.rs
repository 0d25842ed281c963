//! One-call facade combining extraction, categorization, and review
//! gating.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::categorize::CategoryClassifier;
use crate::extract::ReceiptParser;
use crate::memory::VendorStore;
use crate::models::config::EngineConfig;
use crate::models::{CategorizationResult, ExtractionResult};
use crate::review::needs_review;

/// Combined engine output for one receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptAnalysis {
    pub extraction: ExtractionResult,
    pub categorization: CategorizationResult,
    pub needs_review: bool,
}

/// The receipt understanding engine.
///
/// Stateless and side-effect-free per invocation except for vendor-memory
/// reads; safe to share across threads and run in parallel over distinct
/// receipts.
pub struct ReceiptEngine {
    parser: ReceiptParser,
    classifier: CategoryClassifier,
    config: EngineConfig,
}

impl ReceiptEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            parser: ReceiptParser::with_config(&config.extraction),
            classifier: CategoryClassifier::new(),
            config,
        }
    }

    /// Process one receipt's OCR text.
    ///
    /// A known vendor supplied by the workflow overrides the extracted
    /// vendor for categorization only; the extraction result still reports
    /// what the text itself yielded.
    pub fn process(
        &self,
        raw_text: &str,
        known_vendor: Option<&str>,
        memory: &dyn VendorStore,
    ) -> ReceiptAnalysis {
        let extraction = self.parser.parse(raw_text);
        let vendor = known_vendor.unwrap_or(&extraction.vendor);
        let categorization = self.classifier.classify(raw_text, vendor, memory);
        let needs_review = needs_review(&extraction, &categorization, &self.config.review);

        info!(
            vendor = %extraction.vendor,
            category = %categorization.category,
            needs_review,
            "receipt processed"
        );

        ReceiptAnalysis {
            extraction,
            categorization,
            needs_review,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for ReceiptEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{record_approval, InMemoryVendorStore};
    use crate::models::Category;
    use rust_decimal::Decimal;

    const FUEL_RECEIPT: &str =
        "SHELL OIL\n123 MAIN ST\n2024-03-14\nUNLEADED 12.404 GAL\nTOTAL $38.72";

    #[test]
    fn test_process_end_to_end() {
        let engine = ReceiptEngine::new();
        let analysis = engine.process(FUEL_RECEIPT, None, &InMemoryVendorStore::new());

        assert_eq!(analysis.extraction.vendor, "SHELL OIL");
        assert_eq!(analysis.extraction.amount, Decimal::new(3872, 2));
        assert_eq!(analysis.categorization.category, Category::Fuel);
        assert!(analysis.categorization.confidence >= 0.78);
        assert!(!analysis.needs_review);
    }

    #[test]
    fn test_empty_text_needs_review() {
        let analysis = ReceiptEngine::new().process("", None, &InMemoryVendorStore::new());
        assert!(analysis.extraction.vendor.is_empty());
        assert_eq!(analysis.categorization.category, Category::Other);
        assert!(!analysis.categorization.reasons.is_empty());
        assert!(analysis.needs_review);
    }

    #[test]
    fn test_known_vendor_overrides_for_categorization_only() {
        let mut store = InMemoryVendorStore::new();
        record_approval(&mut store, "City Permits Office", Category::PermitsFees, "6700");

        let analysis =
            ReceiptEngine::new().process(FUEL_RECEIPT, Some("City Permits Office"), &store);
        // extraction still reports what the text yielded
        assert_eq!(analysis.extraction.vendor, "SHELL OIL");
        // categorization follows the supplied vendor through memory
        assert_eq!(analysis.categorization.category, Category::PermitsFees);
        assert!(analysis.categorization.from_memory);
    }

    #[test]
    fn test_analysis_serializes_as_plain_record() {
        let analysis = ReceiptEngine::new().process(FUEL_RECEIPT, None, &InMemoryVendorStore::new());
        let json = serde_json::to_string(&analysis).unwrap();
        let back: ReceiptAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
    }
}
