//! Error type shared by every handler.
//!
//! Each variant maps to a fixed status code and always renders a JSON body of
//! the form `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// The requested row doesn't exist.
    NotFound(&'static str),
    /// Input was missing or malformed; the store was not written to.
    Validation(String),
    /// A write failed and its transaction was rolled back. The store's
    /// message is surfaced to the caller as-is.
    Store(sqlx::Error),
    /// A read failed outside of any documented failure mode.
    Internal(sqlx::Error),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Store(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(message) => message.to_string(),
            Self::Validation(message) => message,
            Self::Store(err) => {
                error!("Store error, transaction rolled back: {err}");
                err.to_string()
            }
            Self::Internal(err) => {
                error!("Database error: {err}");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
