//! Maps pipeline errors onto HTTP statuses and the JSON error envelope
//!
//! No pipeline failure is fatal: every error scopes to its request and the
//! server stays available.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use cinesubz_core::CinesubzError;

use crate::types::ErrorResponse;

/// Wrapper giving [`CinesubzError`] an HTTP representation
#[derive(Debug)]
pub struct ApiError(pub CinesubzError);

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self(CinesubzError::InvalidInput(message.into()))
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            CinesubzError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CinesubzError::EntryNotFound(_) | CinesubzError::NoResultsFound(_) => {
                StatusCode::NOT_FOUND
            }
            CinesubzError::UpstreamUnreachable(_)
            | CinesubzError::UpstreamTimeout(_)
            | CinesubzError::UpstreamHttp { .. }
            | CinesubzError::RedirectorUnrecognized(_)
            | CinesubzError::UnmappableUrl(_) => StatusCode::BAD_GATEWAY,
            CinesubzError::MalformedDocument(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CinesubzError> for ApiError {
    fn from(error: CinesubzError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!(kind = self.0.kind(), %status, "request failed");
        (
            status,
            Json(ErrorResponse::new(self.0.kind(), self.0.to_string())),
        )
            .into_response()
    }
}
