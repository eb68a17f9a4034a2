//! Error types for the reel spin orchestrator

use thiserror::Error;

/// Configuration and loading errors
///
/// A rejected trigger is not an error; see [`crate::ReelSpinOrchestrator::trigger_spin`].
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Invalid reel count: {0} (expected {min}..={max})", min = crate::MIN_REELS, max = crate::MAX_REELS)]
    InvalidReelCount(usize),

    #[error("Invalid speed for {field}: {value}")]
    InvalidSpeed { field: &'static str, value: f32 },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Symbol set is empty")]
    EmptySymbolSet,

    #[error("Duplicate symbol id: {0}")]
    DuplicateSymbol(u32),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type ReelResult<T> = Result<T, ReelError>;
