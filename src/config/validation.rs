//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that would otherwise only
//! fail at request time (unusable host pins, header-unsafe iframe origins).
//! All errors are collected, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ShieldConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("general.host {0:?} must be a bare host name, optionally with a port")]
    Host(String),

    #[error("features.protection.iframe {0:?} is not a valid frame-ancestors source list")]
    IframeOrigins(String),

    #[error("rate_limit.{0} must be greater than zero")]
    RateLimitZero(&'static str),
}

/// Check a parsed configuration.
pub fn validate_config(config: &ShieldConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let host = &config.general.host;
    if !host.is_empty() && !is_bare_host(host) {
        errors.push(ValidationError::Host(host.clone()));
    }

    let iframe = &config.features.protection.iframe;
    if !iframe.is_empty() && !is_source_list(iframe) {
        errors.push(ValidationError::IframeOrigins(iframe.clone()));
    }

    if config.rate_limit.burst_size == 0 {
        errors.push(ValidationError::RateLimitZero("burst_size"));
    }
    if config.rate_limit.requests_per_second == 0 {
        errors.push(ValidationError::RateLimitZero("requests_per_second"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_bare_host(host: &str) -> bool {
    !host.contains("://")
        && !host.contains('/')
        && host.bytes().all(|b| b.is_ascii_graphic())
}

/// A `frame-ancestors` value is spliced verbatim into the CSP header, so it
/// must be printable ASCII and must not terminate the directive.
pub(crate) fn is_source_list(value: &str) -> bool {
    !value.trim().is_empty()
        && !value.contains(';')
        && value.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ShieldConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ShieldConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.general.host = "https://example.com/".into();
        config.features.protection.iframe = "https://a.com; script-src *".into();
        config.rate_limit.burst_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::RateLimitZero("burst_size")));
    }

    #[test]
    fn test_host_with_port_is_accepted() {
        let mut config = ShieldConfig::default();
        config.general.host = "example.com:8443".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_source_list() {
        assert!(is_source_list("https://example.com"));
        assert!(is_source_list("'self' https://a.example https://b.example"));
        assert!(!is_source_list("   "));
        assert!(!is_source_list("https://a.com;"));
        assert!(!is_source_list("https://a.com\r\nX-Evil: 1"));
    }
}
