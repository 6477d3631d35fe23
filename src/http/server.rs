//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the three guarded surfaces
//! - Wire up middleware (tracing, request ID, filter pipelines)
//! - Bind server to listener
//! - Apply configuration reloads to the shared config

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Request,
    handler::Handler,
    http::{HeaderName, StatusCode},
    middleware,
    response::{Html, IntoResponse},
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::{SharedConfig, ShieldConfig};
use crate::pipeline::{pipeline_middleware, Pipeline, ShieldComponents};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const INDEX_HTML: &str = "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Webshield</title></head>\n<body><div id=\"app\"></div></body>\n</html>\n";

/// HTTP server exposing the guarded surfaces.
pub struct HttpServer {
    router: Router,
    config: SharedConfig,
    components: ShieldComponents,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ShieldConfig) -> Self {
        Self::with_components(ShieldComponents::new(SharedConfig::new(config)))
    }

    /// Create a server around pre-built components (custom limiter or MIME table).
    pub fn with_components(components: ShieldComponents) -> Self {
        let router = Self::build_router(&components);
        Self {
            router,
            config: components.config.clone(),
            components,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// - `/api/...`: JSON handlers behind the API pipeline
    /// - `/assets/...`: files from `listener.assets_dir` behind the static pipeline
    /// - everything else: the HTML shell behind the index pipeline
    fn build_router(components: &ShieldComponents) -> Router {
        let api_pipeline = Arc::new(Pipeline::api(components));
        let static_pipeline = Arc::new(Pipeline::static_assets(components));
        let index_pipeline = Arc::new(Pipeline::index(components));

        let assets_dir = components.config.load().listener.assets_dir.clone();

        let api = Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/{*rest}", any(api_not_found))
            .route_layer(middleware::from_fn_with_state(api_pipeline, pipeline_middleware));

        let assets = ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(static_pipeline, pipeline_middleware))
            .service(ServeDir::new(assets_dir));

        let index = index_handler.layer(middleware::from_fn_with_state(
            index_pipeline,
            pipeline_middleware,
        ));

        Router::new()
            .merge(api)
            .nest_service("/assets", assets)
            .fallback(index)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn components(&self) -> &ShieldComponents {
        &self.components
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the live one; the
    /// next request through any pipeline sees them.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ShieldConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let config = self.config.clone();
        let reloader = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                tracing::info!(
                    host = %new_config.general.host,
                    force_ssl = new_config.general.force_ssl,
                    iframe = %new_config.features.protection.iframe,
                    "Applying reloaded configuration"
                );
                config.store(new_config);
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // A closed channel means the coordinator is gone; stop too.
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        result
    }
}

/// Span for one request, tagged with the id assigned by `SetRequestIdLayer`.
fn request_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id
    )
}

async fn status_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "Not Found" })),
    )
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
