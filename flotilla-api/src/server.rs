use crate::handlers;
use crate::service::ServiceHandler;
use axum::{
    Router,
    routing::{delete, get, post},
};
use flotilla_core::config::ApiConfig;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the service API.
pub struct ApiState {
    pub handler: ServiceHandler,
    /// Engine API version, reported by `/health`.
    pub engine_api_version: String,
}

/// Build the Axum router with all service API routes.
pub fn build_api_router(state: Arc<ApiState>) -> Router {
    let v1 = Router::new()
        .route("/services", post(handlers::services::create_service))
        .route("/services/{ident}", delete(handlers::services::remove_service));

    Router::new()
        .nest("/v1", v1)
        .route("/health", get(handlers::health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until `shutdown` resolves.
pub async fn serve_api<F>(config: &ApiConfig, state: Arc<ApiState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_api_router(state);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;

    info!(addr = %listener.local_addr()?, "Starting service API");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Service API stopped");
    Ok(())
}
