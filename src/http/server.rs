//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the three flow handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit)
//! - Serve on a listener until the shutdown signal fires

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers::{register, resolve, show_form};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::registry::{MemoryRegistry, Registry};
use crate::validator::{HttpUriValidator, UriValidator};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn Registry>,
    pub validator: Arc<dyn UriValidator>,
    pub config: Arc<ServerConfig>,
}

/// HTTP server for the bookmark registry.
pub struct BookmarkServer {
    router: Router,
    state: AppState,
}

impl BookmarkServer {
    /// Create a server with an empty in-memory registry and a live validator.
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let validator = HttpUriValidator::new(&config.validator)?;
        Ok(Self::with_parts(
            config,
            Arc::new(MemoryRegistry::new()),
            Arc::new(validator),
        ))
    }

    /// Create a server around caller-supplied collaborators.
    pub fn with_parts(
        config: ServerConfig,
        registry: Arc<dyn Registry>,
        validator: Arc<dyn UriValidator>,
    ) -> Self {
        let state = AppState {
            registry,
            validator,
            config: Arc::new(config),
        };
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// The registry this server reads and writes.
    pub fn registry(&self) -> Arc<dyn Registry> {
        self.state.registry.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// In-flight requests are drained once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// GET `/` shows the form, GET on any other path resolves a short name, and
/// POST on any path registers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);
    let body_limit = state.config.security.max_body_size;

    Router::new()
        .route("/", get(show_form).post(register))
        .route("/{*short_name}", get(resolve).post(register))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request),
                    )
                }))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}
