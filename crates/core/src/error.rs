//! Error types for the text reassembly engine.

use thiserror::Error;

/// Primary error type for loading, analyzing and serializing text runs.
#[derive(Error, Debug)]
pub enum ReassembleError {
    #[error("out of memory growing the {0} store")]
    OutOfMemory(&'static str),

    #[error("font resolution failed for `{query}`: {reason}")]
    FontResolution { query: String, reason: String },

    #[error("escapement {got} does not match the run escapement {expected}")]
    EscapementMismatch { expected: f64, got: f64 },

    #[error("cannot measure glyph U+{0:04X}")]
    Advance(u32),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ReassembleError {
    pub(crate) fn font(query: &str, reason: impl Into<String>) -> Self {
        Self::FontResolution {
            query: query.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the escapement change signal the caller answers by flushing
    /// the current run and reloading the chunk.
    pub const fn is_escapement_mismatch(&self) -> bool {
        matches!(self, Self::EscapementMismatch { .. })
    }
}

/// Convenience Result type alias for ReassembleError.
pub type Result<T> = std::result::Result<T, ReassembleError>;
