//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ShieldConfig (validated, immutable)
//!     → published through SharedConfig
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap inside SharedConfig
//!     → filters observe new values on their next request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Filters load a snapshot per request and never write to it

use std::sync::Arc;

use arc_swap::ArcSwap;

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::{
    FeaturesConfig, GeneralConfig, ListenerConfig, ObservabilityConfig, ProtectionConfig,
    RateLimitConfig, ShieldConfig,
};

/// Live, swappable configuration shared by every filter.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<ShieldConfig>>,
}

impl SharedConfig {
    pub fn new(config: ShieldConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Snapshot of the current configuration.
    pub fn load(&self) -> Arc<ShieldConfig> {
        self.inner.load_full()
    }

    /// Publish a new configuration to all readers.
    pub fn store(&self, config: ShieldConfig) {
        self.inner.store(Arc::new(config));
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(ShieldConfig::default())
    }
}
