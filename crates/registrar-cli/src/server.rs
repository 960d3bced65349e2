//! HTTP server implementation using Axum.

use crate::handler::{handle_health, handle_run_pipeline};
use axum::{
    routing::{get, post},
    Router,
};
use registrar_core::PipelineClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers.
pub struct AppState {
    pub pipeline: PipelineClient,
}

/// Build the router.
pub fn router(pipeline: PipelineClient) -> Router {
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/run-pipeline", post(handle_run_pipeline))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(
    pipeline: PipelineClient,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let app = router(pipeline);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
