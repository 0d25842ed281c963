//! Error types for the receipt engine.

use thiserror::Error;

/// Main error type for the engine's ambient edges.
///
/// The extraction and categorization path is total over its input domain
/// and never returns an error; missing signal degrades to documented
/// sentinels (empty vendor, absent date, zero amount, `Other` category,
/// confidence 0.0). Errors only arise when loading configuration or
/// decoding a persisted memory snapshot.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A memory snapshot could not be decoded.
    #[error("memory snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the receipt engine.
pub type Result<T> = std::result::Result<T, EngineError>;
