use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use cil_ledger::ChainError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Chain(ChainError::NotFound { .. }) => StatusCode::NOT_FOUND,
            // A moved tip is a retry-with-refreshed-tip condition, not a
            // server fault.
            Self::Chain(ChainError::InvalidAppend { .. }) => StatusCode::CONFLICT,
            Self::Chain(ChainError::InvalidRange { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let not_found: ServerError = ChainError::NotFound { index: 9 }.into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let conflict: ServerError = ChainError::InvalidAppend {
            index: 1,
            reason: "tip moved".into(),
        }
        .into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let internal = ServerError::Internal("boom".into());
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
