//! Receipt understanding engine.
//!
//! This crate turns noisy OCR text from photographed or scanned purchase
//! receipts into structured fields and a spending category:
//! - field extraction (merchant name, transaction date, total amount) with
//!   a calibrated confidence per field
//! - layered categorization (learned vendor memory, deterministic rules,
//!   keyword scoring) with human-readable reasons
//! - the needs-review policy over extracted/classified values
//! - vendor-memory normalization and merge semantics behind a small
//!   key-value store contract
//!
//! OCR itself, persistent storage, exports, and the UI are external
//! collaborators; the engine consumes one text blob per call and is safe
//! to run in parallel across distinct receipts.

pub mod categorize;
pub mod engine;
pub mod error;
pub mod extract;
pub mod memory;
pub mod models;
pub mod normalize;
pub mod review;

pub use categorize::{CategoryClassifier, CategoryTier, ClassifyContext};
pub use engine::{ReceiptAnalysis, ReceiptEngine};
pub use error::{EngineError, Result};
pub use extract::ReceiptParser;
pub use memory::{
    normalize_vendor_key, record_approval, InMemoryVendorStore, MemorySnapshot, VendorMemoryEntry,
    VendorStore,
};
pub use models::{
    CategorizationResult, Category, EngineConfig, ExtractionConfig, ExtractionResult, ReviewPolicy,
};
pub use review::needs_review;
