//! Pipeline stages that write response headers.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::build_info::BuildInfo;
use crate::config::SharedConfig;
use crate::http::request::RequestContext;
use crate::pipeline::{RequestFilter, Verdict};
use crate::security::csp::FrameAncestors;
use crate::security::headers::{
    api_headers, apply_headers, hardening_headers, index_headers, static_headers,
    ResponseCategory,
};
use crate::security::mime::MimeLookup;

/// nosniff, XSS filter and, with `general.force_ssl`, HSTS.
#[derive(Debug, Clone)]
pub struct TransportHardening {
    config: SharedConfig,
}

impl TransportHardening {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl RequestFilter for TransportHardening {
    fn name(&self) -> &'static str {
        "transport_hardening"
    }

    fn apply(&self, _request: &RequestContext<'_>, headers: &mut HeaderMap) -> Verdict {
        let force_ssl = self.config.load().general.force_ssl;
        apply_headers(headers, &hardening_headers(force_ssl));
        Ok(())
    }
}

/// Category-specific headers; always forwards.
#[derive(Debug, Clone)]
pub struct CategoryHeaders {
    category: ResponseCategory,
    config: SharedConfig,
    mime: Arc<dyn MimeLookup>,
    build: Arc<BuildInfo>,
}

impl CategoryHeaders {
    pub fn new(
        category: ResponseCategory,
        config: SharedConfig,
        mime: Arc<dyn MimeLookup>,
        build: Arc<BuildInfo>,
    ) -> Self {
        Self {
            category,
            config,
            mime,
            build,
        }
    }

    pub fn category(&self) -> ResponseCategory {
        self.category
    }
}

impl RequestFilter for CategoryHeaders {
    fn name(&self) -> &'static str {
        match self.category {
            ResponseCategory::Api => "api_headers",
            ResponseCategory::Static => "static_headers",
            ResponseCategory::Index => "index_headers",
        }
    }

    fn apply(&self, request: &RequestContext<'_>, headers: &mut HeaderMap) -> Verdict {
        let set = match self.category {
            ResponseCategory::Api => api_headers(),
            ResponseCategory::Static => static_headers(request.path(), self.mime.as_ref()),
            ResponseCategory::Index => {
                let config = self.config.load();
                let ancestors = FrameAncestors::from_config(&config.features.protection.iframe);
                index_headers(&ancestors, &self.build)
            }
        };
        apply_headers(headers, &set);
        Ok(())
    }
}
