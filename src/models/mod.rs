//! Public data models and engine configuration.

pub mod config;
pub mod result;

pub use config::{EngineConfig, ExtractionConfig, ReviewPolicy};
pub use result::{CategorizationResult, Category, ExtractionResult};
