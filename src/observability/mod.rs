//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Filters and server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (admission / rejection counters)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
