//! Request-filtering front for a single-page web application.
//!
//! Every request passes an ordered pipeline of filters (host pinning,
//! transport hardening, a global rate limit, an AJAX gate on the API) before
//! a handler runs; the pipeline also decides the security headers written on
//! the response.

pub mod build_info;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod security;

pub use build_info::BuildInfo;
pub use config::{SharedConfig, ShieldConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{Pipeline, RequestFilter, ShieldComponents};
