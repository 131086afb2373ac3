/// Errors produced by chain store operations.
///
/// Verification findings are not errors — a broken chain is an expected,
/// reportable condition returned as data by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("invalid append at index {index}: {reason}")]
    InvalidAppend { index: u64, reason: String },

    #[error("no block at index {index}")]
    NotFound { index: u64 },

    #[error("invalid range: start={start}, end={end}")]
    InvalidRange { start: u64, end: u64 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("chain lock poisoned")]
    LockPoisoned,
}
