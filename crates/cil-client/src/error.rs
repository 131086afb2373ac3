use thiserror::Error;

/// Errors from remote chain operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transient transport failure: timeout, refused connection, 5xx.
    /// Retryable with backoff.
    #[error("chain endpoint unavailable: {0}")]
    Unavailable(String),

    /// Non-retryable HTTP failure (4xx other than append conflicts).
    #[error("request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The server rejected an append because the tip moved.
    /// Refresh the tip and resubmit deliberately; never retried silently.
    #[error("append conflict: {0}")]
    Conflict(String),

    /// The response body could not be decoded as the expected shape.
    #[error("could not decode response body: {0}")]
    Decode(String),

    /// The client itself could not be constructed.
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns `true` for conditions worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
