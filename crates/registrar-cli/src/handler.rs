//! HTTP request handlers.

use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use registrar_core::{PipelineRequest, RegistrarError};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Error body returned by the pipeline endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(err: &RegistrarError) -> (StatusCode, Json<ErrorBody>) {
    let status =
        StatusCode::from_u16(err.to_http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

fn rejection_response(rejection: &JsonRejection) -> (StatusCode, Json<ErrorBody>) {
    (
        rejection.status(),
        Json(ErrorBody {
            error: rejection.body_text(),
        }),
    )
}

/// Create a pipeline from the posted configuration and trigger a run.
pub async fn handle_run_pipeline(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PipelineRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected run-pipeline body: {}", rejection.body_text());
            return rejection_response(&rejection).into_response();
        }
    };
    debug!("run-pipeline: {}", request.pipeline_name);

    match state.pipeline.run(&request).await {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(e) => {
            error!("Pipeline run failed for {}: {}", request.pipeline_name, e);
            error_response(&e).into_response()
        }
    }
}
