//! Receipt parsing: runs the field selectors and aggregates the result.

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::ExtractionResult;
use crate::normalize::NormalizedText;

use super::rules::{AmountSelector, DateSelector, VendorSelector};

/// Weights combining the field confidences into one parse confidence.
/// A wrong vendor is the most damaging downstream error; the date is the
/// easiest field to fix by hand.
const VENDOR_WEIGHT: f32 = 0.45;
const AMOUNT_WEIGHT: f32 = 0.35;
const DATE_WEIGHT: f32 = 0.20;

/// Turns raw OCR text into a structured extraction result.
///
/// Parsing is total: any input, including empty text, yields a result
/// whose absent fields carry confidence 0.0. The three selectors are
/// independent of each other and order-insensitive.
pub struct ReceiptParser {
    vendor: VendorSelector,
    dates: DateSelector,
    amounts: AmountSelector,
}

impl ReceiptParser {
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            vendor: VendorSelector::new().with_window(config.vendor_window),
            dates: DateSelector::new().with_header_lines(config.date_header_lines),
            amounts: AmountSelector::new()
                .with_bottom_fraction(config.bottom_fraction)
                .with_ceilings(config.labeled_ceiling, config.fallback_ceiling),
        }
    }

    pub fn parse(&self, raw_text: &str) -> ExtractionResult {
        let doc = NormalizedText::new(raw_text);
        info!(lines = doc.lines().len(), "parsing receipt text");

        let vendor = self.vendor.select(doc.lines());
        let date = self.dates.select(doc.lines());
        let amount = self.amounts.select(doc.lines());

        let (date_value, date_confidence) = match date {
            Some(m) => (Some(m.value), m.confidence),
            None => (None, 0.0),
        };

        let parse_confidence = VENDOR_WEIGHT * vendor.confidence
            + AMOUNT_WEIGHT * amount.confidence
            + DATE_WEIGHT * date_confidence;

        debug!(
            vendor = %vendor.name,
            date = ?date_value,
            amount = %amount.value,
            parse_confidence,
            "extraction complete"
        );

        ExtractionResult {
            vendor: vendor.name,
            vendor_candidates: vendor.alternates,
            vendor_confidence: vendor.confidence,
            date: date_value,
            date_confidence,
            amount: amount.value,
            amount_confidence: amount.confidence,
            parse_confidence,
        }
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}
