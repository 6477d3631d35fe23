//! The contract every pipeline stage implements.

use axum::http::HeaderMap;

use crate::http::request::RequestContext;
use crate::http::response::Rejection;

/// Outcome of one stage: `Ok(())` forwards to the next stage.
pub type Verdict = Result<(), Rejection>;

/// A single security or traffic-shaping check.
///
/// Filters run synchronously, in pipeline order, before the handler. They may
/// write to the pending response headers; those writes are discarded if any
/// later stage rejects.
pub trait RequestFilter: Send + Sync + std::fmt::Debug {
    /// Short label for logs and metrics.
    fn name(&self) -> &'static str;

    fn apply(&self, request: &RequestContext<'_>, headers: &mut HeaderMap) -> Verdict;
}
