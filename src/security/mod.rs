//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → host.rs (pin declared host, reject mismatches)
//!     → policy.rs (transport hardening headers)
//!     → rate_limit.rs (global token bucket)
//!     → ajax.rs (API routes only: require auth or XHR marker)
//!     → policy.rs + headers.rs + csp.rs (category headers)
//!     → Pass to handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - Header builders are pure; filters only decide and forward
//! - Configuration is read per request, never written

pub mod ajax;
pub mod csp;
pub mod headers;
pub mod host;
pub mod mime;
pub mod policy;
pub mod rate_limit;

pub use ajax::AjaxGuard;
pub use csp::{content_security_policy, FrameAncestors};
pub use headers::ResponseCategory;
pub use host::HostGuard;
pub use mime::{MimeLookup, StaticMimeTable};
pub use policy::{CategoryHeaders, TransportHardening};
pub use rate_limit::{GlobalRateLimiter, RateLimit};
