//! Layered spending categorization.
//!
//! Three tiers run in precedence order - learned vendor memory,
//! deterministic rules, keyword scoring - and the first tier to produce a
//! result wins. The keyword tier is total, so classification always
//! returns a category with a non-empty reason list.

pub mod keywords;
pub mod rules;

use tracing::debug;

use crate::memory::{normalize_vendor_key, VendorStore};
use crate::models::{CategorizationResult, Category};
use crate::normalize::{normalize_blob, NormalizedText};

pub use keywords::KeywordTier;
pub use rules::RuleTier;

/// Inputs shared by every classification tier.
pub struct ClassifyContext {
    /// Vendor string as supplied (extracted or user-typed).
    pub vendor: String,

    /// Normalized memory key for the vendor.
    pub vendor_key: String,

    /// Normalized vendor for rule matching.
    pub vendor_norm: String,

    /// Cleaned receipt lines in original case (for token matchers).
    pub raw_lines: Vec<String>,

    /// Normalized per-line text.
    pub lines: Vec<String>,

    /// Normalized vendor+text blob for keyword search.
    pub blob: String,
}

impl ClassifyContext {
    pub fn new(raw_text: &str, vendor: &str) -> Self {
        let doc = NormalizedText::new(raw_text);
        let vendor_norm = normalize_blob(vendor);
        let lines: Vec<String> = doc.lines().iter().map(|l| normalize_blob(l)).collect();
        let blob = format!("{} {}", vendor_norm, doc.blob()).trim().to_string();
        Self {
            vendor: vendor.to_string(),
            vendor_key: normalize_vendor_key(vendor),
            vendor_norm,
            raw_lines: doc.lines().to_vec(),
            lines,
            blob,
        }
    }
}

/// One tier in the layered decision; `None` passes to the next tier.
pub trait CategoryTier: Send + Sync {
    fn name(&self) -> &'static str;

    fn classify(
        &self,
        ctx: &ClassifyContext,
        memory: &dyn VendorStore,
    ) -> Option<CategorizationResult>;
}

/// Chain of tiers; precedence is the construction order.
pub struct CategoryClassifier {
    tiers: Vec<Box<dyn CategoryTier>>,
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self {
            tiers: vec![
                Box::new(MemoryTier),
                Box::new(RuleTier),
                Box::new(KeywordTier),
            ],
        }
    }

    /// Classification is total: any input yields a category, a bounded
    /// confidence, and at least one reason.
    pub fn classify(
        &self,
        raw_text: &str,
        vendor: &str,
        memory: &dyn VendorStore,
    ) -> CategorizationResult {
        let ctx = ClassifyContext::new(raw_text, vendor);
        for tier in &self.tiers {
            if let Some(mut result) = tier.classify(&ctx, memory) {
                debug!(tier = tier.name(), category = %result.category, "category tier hit");
                finalize_reasons(&mut result.reasons);
                return result;
            }
        }
        // the keyword tier never passes, so this is unreachable in practice
        CategorizationResult {
            category: Category::Other,
            confidence: 0.0,
            reasons: vec!["No classification signal found".to_string()],
            from_memory: false,
        }
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Dedup while preserving order, cap for display, never leave empty.
fn finalize_reasons(reasons: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    reasons.retain(|r| seen.insert(r.clone()));
    reasons.truncate(4);
    if reasons.is_empty() {
        reasons.push("No classification signal found".to_string());
    }
}

/// Tier 1: learned vendor memory. A hit is treated by the review workflow
/// as auto-approvable.
struct MemoryTier;

impl CategoryTier for MemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn classify(
        &self,
        ctx: &ClassifyContext,
        memory: &dyn VendorStore,
    ) -> Option<CategorizationResult> {
        if ctx.vendor_key.is_empty() {
            return None;
        }
        let entry = memory.get(&ctx.vendor_key)?;
        Some(CategorizationResult {
            category: entry.category,
            confidence: 0.95,
            reasons: vec![
                format!(
                    "Learned from {} prior receipt{}",
                    entry.count,
                    if entry.count == 1 { "" } else { "s" }
                ),
                format!("Vendor '{}' has an approved mapping", ctx.vendor.trim()),
            ],
            from_memory: true,
        })
    }
}
