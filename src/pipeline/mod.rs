//! Request filter pipelines.
//!
//! # Data Flow
//! ```text
//! Request
//!     → RequestContext (borrowed view)
//!     → filter 1 → filter 2 → ... (each: forward or reject)
//!     → Ok(headers): handler runs, headers written onto its response
//!     → Err(rejection): rejection response, handler never runs
//! ```
//!
//! # Design Decisions
//! - Explicit ordered list instead of nested wrappers; easy to test and reorder
//! - Host guard always first, rate limit before anything handler-specific
//! - Shared state (limiter, config) is injected, never global

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::build_info::BuildInfo;
use crate::config::SharedConfig;
use crate::http::request::RequestContext;
use crate::http::response::Rejection;
use crate::observability::metrics;
use crate::security::{
    AjaxGuard, CategoryHeaders, GlobalRateLimiter, HostGuard, MimeLookup, RateLimit,
    ResponseCategory, StaticMimeTable, TransportHardening,
};

pub mod filter;
pub mod middleware;

pub use filter::{RequestFilter, Verdict};
pub use middleware::pipeline_middleware;

/// Everything the standard pipelines share.
#[derive(Debug, Clone)]
pub struct ShieldComponents {
    pub config: SharedConfig,
    pub limiter: Arc<GlobalRateLimiter>,
    pub mime: Arc<dyn MimeLookup>,
    pub build: Arc<BuildInfo>,
}

impl ShieldComponents {
    /// Components with the built-in MIME table and compile-time build info.
    /// The limiter is sized from the configuration current at this moment.
    pub fn new(config: SharedConfig) -> Self {
        let limiter = Arc::new(GlobalRateLimiter::from_config(&config.load().rate_limit));
        Self {
            config,
            limiter,
            mime: Arc::new(StaticMimeTable),
            build: Arc::new(BuildInfo::current()),
        }
    }

    pub fn with_limiter(mut self, limiter: Arc<GlobalRateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_mime(mut self, mime: Arc<dyn MimeLookup>) -> Self {
        self.mime = mime;
        self
    }

    fn category_headers(&self, category: ResponseCategory) -> CategoryHeaders {
        CategoryHeaders::new(
            category,
            self.config.clone(),
            Arc::clone(&self.mime),
            Arc::clone(&self.build),
        )
    }

    /// Host guard, transport hardening and rate limit: the common prefix.
    fn guarded(&self, label: &'static str) -> PipelineBuilder {
        PipelineBuilder::new(label)
            .filter(HostGuard::new(self.config.clone()))
            .filter(TransportHardening::new(self.config.clone()))
            .filter(RateLimit::new(Arc::clone(&self.limiter)))
    }
}

/// An ordered list of filters evaluated before a handler.
#[derive(Debug, Clone)]
pub struct Pipeline {
    label: &'static str,
    filters: Vec<Arc<dyn RequestFilter>>,
}

impl Pipeline {
    pub fn builder(label: &'static str) -> PipelineBuilder {
        PipelineBuilder::new(label)
    }

    /// JSON API: guards, AJAX gate, then API headers.
    pub fn api(components: &ShieldComponents) -> Self {
        components
            .guarded(ResponseCategory::Api.as_str())
            .filter(AjaxGuard)
            .filter(components.category_headers(ResponseCategory::Api))
            .build()
    }

    /// Static assets: guards, then long-lived cache headers.
    pub fn static_assets(components: &ShieldComponents) -> Self {
        components
            .guarded(ResponseCategory::Static.as_str())
            .filter(components.category_headers(ResponseCategory::Static))
            .build()
    }

    /// HTML shell: guards, then the hardened document headers.
    pub fn index(components: &ShieldComponents) -> Self {
        components
            .guarded(ResponseCategory::Index.as_str())
            .filter(components.category_headers(ResponseCategory::Index))
            .build()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run every filter in order.
    ///
    /// Returns the headers to write onto the handler's response, or the first
    /// rejection. Headers gathered before a rejection are dropped.
    pub fn evaluate(&self, request: &RequestContext<'_>) -> Result<HeaderMap, Rejection> {
        let mut headers = HeaderMap::new();
        for filter in &self.filters {
            if let Err(rejection) = filter.apply(request, &mut headers) {
                metrics::record_rejection(self.label, filter.name(), rejection);
                return Err(rejection);
            }
        }
        metrics::record_admitted(self.label);
        Ok(headers)
    }
}

/// Assembles a [`Pipeline`] in call order.
#[derive(Debug)]
pub struct PipelineBuilder {
    label: &'static str,
    filters: Vec<Arc<dyn RequestFilter>>,
}

impl PipelineBuilder {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: impl RequestFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn shared_filter(mut self, filter: Arc<dyn RequestFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            label: self.label,
            filters: self.filters,
        }
    }
}
