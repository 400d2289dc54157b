use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::ContainerRuntime;
use crate::infrastructure::{InMemoryLedgerStore, ManagerConfig, QueueMessageSource};

/// Application state shared across handlers - uses concrete infrastructure
/// types except for the container runtime, which stays behind its port so
/// tests can launch nothing.
pub struct AppState {
    pub store: Arc<InMemoryLedgerStore>,
    pub source: Arc<QueueMessageSource>,
    pub runtime: Arc<dyn ContainerRuntime>,
    pub config: ManagerConfig,
}

impl AppState {
    pub fn new(
        store: Arc<InMemoryLedgerStore>,
        source: Arc<QueueMessageSource>,
        runtime: Arc<dyn ContainerRuntime>,
        config: ManagerConfig,
    ) -> Self {
        AppState {
            store,
            source,
            runtime,
            config,
        }
    }
}

/// Bracket every request with a log line; failures carry the request URL
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::info!(%method, %uri, "called");

    let response = next.run(request).await;

    if response.status().is_client_error() || response.status().is_server_error() {
        tracing::error!(%method, %uri, status = %response.status(), "request failed");
    } else {
        tracing::info!(%method, %uri, status = %response.status(), "ended");
    }
    response
}

/// Create the REST API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .route("/management/upload", post(handlers::upload))
        .route("/management/initiliaze", post(handlers::initialize))
        .route("/margin", get(handlers::margin))
        .route("/orders/get", get(handlers::orders))
        .route("/positions", get(handlers::positions));

    Router::new()
        .nest("/bot_manager", api)
        // Middleware
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
