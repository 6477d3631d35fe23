//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shield.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the security layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ShieldConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Host pinning and transport settings.
    pub general: GeneralConfig,

    /// Feature toggles (iframe protection).
    pub features: FeaturesConfig,

    /// Global admission control.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8334").
    pub bind_address: String,

    /// Directory served under `/assets`.
    pub assets_dir: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8334".to_string(),
            assets_dir: "./public".to_string(),
        }
    }
}

/// `[general]` section.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Exact host requests must be addressed to. Empty disables pinning.
    pub host: String,

    /// Emit `Strict-Transport-Security` on every response.
    pub force_ssl: bool,
}

/// `[features]` section.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FeaturesConfig {
    pub protection: ProtectionConfig,
}

/// `[features.protection]` section.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProtectionConfig {
    /// Origins allowed to frame the application. Empty denies all framing.
    pub iframe: String,
}

/// Rate limiting configuration.
///
/// Read once when the limiter is built; reloads do not resize a live bucket.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Tokens refilled per second.
    pub requests_per_second: u32,

    /// Bucket capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 5,
            burst_size: 500,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ShieldConfig = toml::from_str("").unwrap();
        assert_eq!(config, ShieldConfig::default());
        assert_eq!(config.rate_limit.burst_size, 500);
        assert_eq!(config.rate_limit.requests_per_second, 5);
        assert!(config.general.host.is_empty());
        assert!(!config.general.force_ssl);
    }

    #[test]
    fn test_dotted_keys_map_to_sections() {
        let config: ShieldConfig = toml::from_str(
            r#"
            [general]
            host = "files.example.com"
            force_ssl = true

            [features.protection]
            iframe = "https://example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.general.host, "files.example.com");
        assert!(config.general.force_ssl);
        assert_eq!(config.features.protection.iframe, "https://example.com");
    }
}
