//! Axum glue: mount a [`Pipeline`] in front of a router's handlers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::CACHE_CONTROL, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::RequestContext;
use crate::pipeline::Pipeline;
use crate::security::headers::apply_headers;

/// Evaluate the pipeline, then run the handler and stamp the collected
/// headers onto its response.
///
/// Pipeline headers overwrite any the handler set for the same name. Error
/// responses always get `Cache-Control: no-cache`.
///
/// ```ignore
/// let api = Arc::new(Pipeline::api(&components));
/// let router = Router::new()
///     .route("/api/status", get(status))
///     .layer(middleware::from_fn_with_state(api, pipeline_middleware));
/// ```
pub async fn pipeline_middleware(
    State(pipeline): State<Arc<Pipeline>>,
    request: Request,
    next: Next,
) -> Response {
    let verdict = pipeline.evaluate(&RequestContext::from_request(&request));
    let mut headers = match verdict {
        Ok(headers) => headers,
        Err(rejection) => return rejection.into_response(),
    };

    let mut response = next.run(request).await;
    let status = response.status();
    if (status.is_client_error() || status.is_server_error()) && headers.contains_key(CACHE_CONTROL)
    {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }
    apply_headers(response.headers_mut(), &headers);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SharedConfig, ShieldConfig};
    use crate::pipeline::ShieldComponents;
    use crate::security::GlobalRateLimiter;
    use axum::{
        body::Body,
        http::{header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn app(pipeline: Pipeline, hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/{*path}",
                get(move || {
                    let hits = Arc::clone(&hits);
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "handled"
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(
                Arc::new(pipeline),
                pipeline_middleware,
            ))
    }

    #[tokio::test]
    async fn test_forwarded_response_carries_pipeline_headers() {
        let components = ShieldComponents::new(SharedConfig::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app(Pipeline::api(&components), hits.clone());

        let request = Request::builder()
            .uri("/api/status")
            .header("Authorization", "Bearer token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        // The handler's text/plain is replaced.
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejection_skips_handler() {
        let mut config = ShieldConfig::default();
        config.general.host = "files.example.com".into();
        let components = ShieldComponents::new(SharedConfig::new(config));
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app(Pipeline::index(&components), hits.clone());

        let request = Request::builder()
            .uri("/index.html")
            .header("Host", "attacker.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(!response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
        assert!(!response.headers().contains_key(header::X_XSS_PROTECTION));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_limited_request_gets_429() {
        let components = ShieldComponents::new(SharedConfig::default())
            .with_limiter(Arc::new(GlobalRateLimiter::new(1, 1)));
        let hits = Arc::new(AtomicUsize::new(0));
        let app = app(Pipeline::static_assets(&components), hits.clone());

        let first = app
            .clone()
            .oneshot(Request::builder().uri("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[header::CACHE_CONTROL], "max-age=2592000");

        let second = app
            .oneshot(Request::builder().uri("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_response_is_not_cached() {
        let components = ShieldComponents::new(SharedConfig::default());
        let app = Router::new()
            .route("/{*path}", get(|| async { StatusCode::NOT_FOUND }))
            .layer(middleware::from_fn_with_state(
                Arc::new(Pipeline::static_assets(&components)),
                pipeline_middleware,
            ));

        let response = app
            .oneshot(Request::builder().uri("/missing.js").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}
