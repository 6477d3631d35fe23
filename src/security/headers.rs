//! Response header policies.
//!
//! Pure builders: each returns the complete header set for one response
//! category. Writing the set onto a response is the pipeline's job.

use std::path::Path;

use axum::http::{
    header::{
        CACHE_CONTROL, CONTENT_SECURITY_POLICY, CONTENT_TYPE, REFERRER_POLICY,
        STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
    },
    HeaderMap, HeaderName, HeaderValue,
};

use crate::build_info::BuildInfo;
use crate::security::csp::{content_security_policy, FrameAncestors};
use crate::security::mime::{MimeLookup, DEFAULT_MIME_TYPE};

pub const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");

/// 30 days.
pub const STATIC_CACHE_CONTROL: &str = "max-age=2592000";
pub const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains; preload";

/// Which kind of response a pipeline is guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCategory {
    /// JSON API endpoints.
    Api,
    /// Static assets; content type follows the file extension.
    Static,
    /// The HTML application shell.
    Index,
}

impl ResponseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCategory::Api => "api",
            ResponseCategory::Static => "static",
            ResponseCategory::Index => "index",
        }
    }
}

/// Headers for JSON API responses.
pub fn api_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

/// Headers for a static asset, keyed on the extension of `path`.
pub fn static_headers(path: &str, mime: &dyn MimeLookup) -> HeaderMap {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let content_type = HeaderValue::from_str(mime.mime_type(extension))
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MIME_TYPE));

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(STATIC_CACHE_CONTROL));
    headers
}

/// Hardened headers for the HTML document, including the CSP.
pub fn index_headers(ancestors: &FrameAncestors, build: &BuildInfo) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    if let Ok(value) = HeaderValue::from_str(&build.powered_by()) {
        headers.insert(X_POWERED_BY, value);
    }

    // from_config only admits header-safe origins, so the fallback is unreachable
    // in practice; it still fails closed.
    match HeaderValue::from_str(&content_security_policy(ancestors)) {
        Ok(csp) => {
            headers.insert(CONTENT_SECURITY_POLICY, csp);
            if ancestors.denies_framing() {
                headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
            }
        }
        Err(_) => {
            if let Ok(csp) = HeaderValue::from_str(&content_security_policy(&FrameAncestors::Deny)) {
                headers.insert(CONTENT_SECURITY_POLICY, csp);
            }
            headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        }
    }
    headers
}

/// Transport hardening applied to every guarded response.
pub fn hardening_headers(force_ssl: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if force_ssl {
        headers.insert(STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS_VALUE));
    }
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    headers
}

/// Copy `source` onto `target`, overwriting any existing value per name.
pub fn apply_headers(target: &mut HeaderMap, source: &HeaderMap) {
    for (name, value) in source {
        target.insert(name.clone(), value.clone());
    }
}
