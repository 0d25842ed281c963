//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Top-level configuration for the receipt engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Field extraction tunables.
    pub extraction: ExtractionConfig,

    /// Review gating thresholds.
    pub review: ReviewPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            review: ReviewPolicy::default(),
        }
    }
}

/// Tunables for field extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of leading lines scanned for vendor candidates. Vendor
    /// headers can appear after a few lines of OCR garbage, so this is a
    /// window, not a hard position.
    pub vendor_window: usize,

    /// Leading lines where a date match is preferred over one found
    /// further down.
    pub date_header_lines: usize,

    /// Fraction of the line list marking the start of the totals region.
    pub bottom_fraction: f32,

    /// Ceiling in whole dollars for a labeled total with no
    /// subtotal+tax reference to confirm it.
    pub labeled_ceiling: u32,

    /// Ceiling in whole dollars for fallback maxima.
    pub fallback_ceiling: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            vendor_window: 72,
            date_header_lines: 24,
            bottom_fraction: 0.5,
            labeled_ceiling: 20_000,
            fallback_ceiling: 10_000,
        }
    }
}

/// User-tunable thresholds for the needs-review decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPolicy {
    /// Records whose overall parse confidence falls below this floor go
    /// to review.
    pub parse_confidence_floor: f32,

    /// Records categorized below this confidence go to review.
    pub category_confidence_floor: f32,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            parse_confidence_floor: 0.25,
            category_confidence_floor: 0.45,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.extraction.vendor_window, 72);
        assert_eq!(config.review.parse_confidence_floor, 0.25);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extraction.labeled_ceiling, config.extraction.labeled_ceiling);
        assert_eq!(back.review.category_confidence_floor, config.review.category_confidence_floor);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"review": {"parse_confidence_floor": 0.5}}"#).unwrap();
        assert_eq!(config.review.parse_confidence_floor, 0.5);
        assert_eq!(config.review.category_confidence_floor, 0.45);
        assert_eq!(config.extraction.vendor_window, 72);
    }
}
