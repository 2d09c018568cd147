// HTTP error type - every failure leaves the API as `{"detail": "..."}`
// with a matching status code.

use crate::core::gallery::GalleryError;
use crate::core::guestbook::GuestbookError;
use crate::core::timeline::TimelineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed input (400)
    Validation(String),
    /// Referenced entity absent (404)
    NotFound(String),
    /// Missing or wrong admin credential (401)
    Unauthorized,
    /// Submission rate limit hit (429)
    RateLimited(String),
    /// Anything the caller can't fix (500); the real cause is logged
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "invalid or missing API key".to_string(),
            ),
            ApiError::RateLimited(detail) => (StatusCode::TOO_MANY_REQUESTS, detail),
            ApiError::Internal(cause) => {
                tracing::error!(%cause, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<GuestbookError> for ApiError {
    fn from(err: GuestbookError) -> Self {
        match err {
            GuestbookError::Storage(cause) => ApiError::Internal(cause),
            GuestbookError::Validation(detail) => ApiError::Validation(detail),
            GuestbookError::NotFound => ApiError::NotFound(err.to_string()),
            GuestbookError::RateLimited => ApiError::RateLimited(err.to_string()),
        }
    }
}

impl From<GalleryError> for ApiError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::Storage(cause) | GalleryError::Media(cause) => ApiError::Internal(cause),
            GalleryError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<TimelineError> for ApiError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::Storage(cause) => ApiError::Internal(cause),
            TimelineError::NotFound => ApiError::NotFound(err.to_string()),
        }
    }
}
