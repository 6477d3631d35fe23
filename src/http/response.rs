//! Rejection responses.
//!
//! Every filter in a pipeline either forwards or fails with a [`Rejection`].
//! A rejection is terminal: it becomes the whole response, with the standard
//! JSON error payload and nothing else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a request was refused before reaching its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Policy rejection: host mismatch or missing AJAX/auth marker.
    #[error("Not Allowed")]
    NotAllowed,

    /// Admission control rejection from the global rate limiter.
    #[error("Too Many Requests")]
    TooManyRequests,
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::NotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Rejection::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Stable label used in metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::NotAllowed => "not_allowed",
            Rejection::TooManyRequests => "too_many_requests",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Rejection::NotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(Rejection::TooManyRequests.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_too_many_requests_body_uses_reason_phrase() {
        let response = Rejection::TooManyRequests.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["message"],
            StatusCode::TOO_MANY_REQUESTS.canonical_reason().unwrap()
        );
    }
}
