//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webshield_requests_admitted_total` (counter): requests that passed every
//!   filter, by pipeline
//! - `webshield_requests_rejected_total` (counter): rejections by pipeline,
//!   filter and reason
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Label values are `&'static str`; no per-request allocation
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::http::response::Rejection;

pub const REQUESTS_ADMITTED: &str = "webshield_requests_admitted_total";
pub const REQUESTS_REJECTED: &str = "webshield_requests_rejected_total";

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            metrics::describe_counter!(
                REQUESTS_ADMITTED,
                "Requests that passed every filter of a pipeline"
            );
            metrics::describe_counter!(
                REQUESTS_REJECTED,
                "Requests rejected by a pipeline filter"
            );
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, address = %addr, "Failed to install metrics exporter");
        }
    }
}

pub fn record_admitted(pipeline: &'static str) {
    counter!(REQUESTS_ADMITTED, "pipeline" => pipeline).increment(1);
}

pub fn record_rejection(pipeline: &'static str, filter: &'static str, rejection: Rejection) {
    counter!(
        REQUESTS_REJECTED,
        "pipeline" => pipeline,
        "filter" => filter,
        "reason" => rejection.reason()
    )
    .increment(1);
}
