//! AJAX gate.
//!
//! Heuristic CSRF mitigation: API calls must either carry credentials or be
//! marked as XHR. A plain browser navigation or cross-site form post carries
//! neither. This is not authentication; the Authorization value is left for
//! downstream handlers to verify.

use axum::http::{header, HeaderMap};

use crate::http::request::RequestContext;
use crate::http::response::Rejection;
use crate::pipeline::{RequestFilter, Verdict};

pub const X_REQUESTED_WITH: &str = "x-requested-with";
pub const XHR_MARKER: &str = "XmlHttpRequest";

#[derive(Debug, Clone, Copy, Default)]
pub struct AjaxGuard;

impl AjaxGuard {
    pub fn is_programmatic(request: &RequestContext<'_>) -> bool {
        let has_credentials = request
            .headers
            .get(header::AUTHORIZATION)
            .is_some_and(|value| !value.as_bytes().is_empty());
        has_credentials
            || request.header_str(X_REQUESTED_WITH) == XHR_MARKER
    }
}

impl RequestFilter for AjaxGuard {
    fn name(&self) -> &'static str {
        "ajax_guard"
    }

    fn apply(&self, request: &RequestContext<'_>, _headers: &mut HeaderMap) -> Verdict {
        if Self::is_programmatic(request) {
            return Ok(());
        }

        let remote_addr = request
            .remote_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        tracing::warn!(
            remote_addr = %remote_addr,
            url = %request.uri,
            method = %request.method,
            "Intrusion detection: {} - {}",
            remote_addr,
            request.uri
        );
        Err(Rejection::NotAllowed)
    }
}
