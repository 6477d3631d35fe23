//! Host pinning.
//!
//! When `general.host` is set, only requests addressed to that host (or to
//! the same host on port 443) get through. Mitigates DNS rebinding and
//! Host header attacks.

use axum::http::HeaderMap;

use crate::config::SharedConfig;
use crate::http::request::RequestContext;
use crate::http::response::Rejection;
use crate::pipeline::{RequestFilter, Verdict};

/// Whether `declared` satisfies the pin `expected`.
pub fn host_allowed(expected: &str, declared: &str) -> bool {
    if declared == expected {
        return true;
    }
    declared
        .strip_prefix(expected)
        .is_some_and(|rest| rest == ":443")
}

#[derive(Debug, Clone)]
pub struct HostGuard {
    config: SharedConfig,
}

impl HostGuard {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl RequestFilter for HostGuard {
    fn name(&self) -> &'static str {
        "host_guard"
    }

    fn apply(&self, request: &RequestContext<'_>, _headers: &mut HeaderMap) -> Verdict {
        let config = self.config.load();
        let expected = config.general.host.as_str();
        if expected.is_empty() {
            return Ok(());
        }

        let declared = request.declared_host().unwrap_or_default();
        if host_allowed(expected, declared) {
            return Ok(());
        }

        tracing::error!(
            host = %declared,
            expected_host = %expected,
            remote_addr = ?request.remote_addr,
            "Request coming from \"{}\" was blocked, only traffic from \"{}\" is allowed. \
             Change general.host to allow it",
            declared,
            expected
        );
        Err(Rejection::NotAllowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShieldConfig;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};

    fn guard_for(host: &str) -> HostGuard {
        let mut config = ShieldConfig::default();
        config.general.host = host.to_string();
        HostGuard::new(SharedConfig::new(config))
    }

    fn run(guard: &HostGuard, host: Option<&str>) -> Verdict {
        let mut builder = Request::builder().uri("/api/files");
        if let Some(host) = host {
            builder = builder.header("Host", host);
        }
        let request = builder.body(Body::empty()).unwrap();
        guard.apply(&RequestContext::from_request(&request), &mut HeaderMap::new())
    }

    #[test]
    fn test_no_pin_never_rejects() {
        let guard = guard_for("");
        for host in [Some("anything"), Some("evil.com:8080"), None] {
            assert_eq!(run(&guard, host), Ok(()));
        }
    }

    #[test]
    fn test_exact_and_tls_port_match() {
        let guard = guard_for("files.example.com");
        assert_eq!(run(&guard, Some("files.example.com")), Ok(()));
        assert_eq!(run(&guard, Some("files.example.com:443")), Ok(()));
    }

    #[test]
    fn test_mismatch_rejects() {
        let guard = guard_for("files.example.com");
        for host in [
            Some("evil.com"),
            Some("files.example.com:8080"),
            Some("files.example.com.evil.com"),
            Some("sub.files.example.com"),
            None,
        ] {
            assert_eq!(run(&guard, host), Err(Rejection::NotAllowed), "{host:?}");
        }
    }

    #[test]
    fn test_absolute_target_overrides_pinned_host_header() {
        let guard = guard_for("files.example.com");
        let request = Request::builder()
            .uri("http://evil.com/")
            .header("Host", "files.example.com")
            .body(Body::empty())
            .unwrap();
        let verdict = guard.apply(&RequestContext::from_request(&request), &mut HeaderMap::new());
        assert_eq!(verdict, Err(Rejection::NotAllowed));
    }

    #[test]
    fn test_non_ascii_host_header_rejects_despite_matching_authority() {
        let guard = guard_for("files.example.com");
        let mut request = Request::builder()
            .uri("http://files.example.com/")
            .body(Body::empty())
            .unwrap();
        request.headers_mut().insert(
            axum::http::header::HOST,
            HeaderValue::from_bytes(b"evil\xff.com").unwrap(),
        );
        let verdict = guard.apply(&RequestContext::from_request(&request), &mut HeaderMap::new());
        assert_eq!(verdict, Err(Rejection::NotAllowed));
    }

    #[test]
    fn test_rejection_writes_no_headers() {
        let guard = guard_for("files.example.com");
        let request = Request::builder()
            .header("Host", "evil.com")
            .body(Body::empty())
            .unwrap();
        let mut headers = HeaderMap::new();
        let verdict = guard.apply(&RequestContext::from_request(&request), &mut headers);
        assert!(verdict.is_err());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_reads_config_per_request() {
        let shared = SharedConfig::default();
        let guard = HostGuard::new(shared.clone());
        assert_eq!(run(&guard, Some("evil.com")), Ok(()));

        let mut pinned = ShieldConfig::default();
        pinned.general.host = "files.example.com".into();
        shared.store(pinned);

        assert_eq!(run(&guard, Some("evil.com")), Err(Rejection::NotAllowed));
    }
}
