use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

pub(crate) fn map_query_rejection(err: QueryRejection) -> ApiError {
    ApiError::bad_request("InvalidQuery", format!("Invalid query parameters: {}", err.body_text()))
}

pub(crate) fn map_path_rejection(err: PathRejection) -> ApiError {
    ApiError::bad_request("InvalidPath", format!("Invalid path parameter: {}", err.body_text()))
}

/// Unwrap an optional query extractor, reporting a 400 on bad input
pub(crate) fn query_or_400<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(params)| params).map_err(map_query_rejection)
}

pub(crate) fn id_or_400(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    id.map(|Path(id)| id).map_err(map_path_rejection)
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs();
    let now = chrono::Utc::now().to_rfc3339();

    match state.repo.ping().await {
        Ok(()) => {
            tracing::debug!(uptime_secs = uptime, "health check passed");
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": now,
                    "uptime_secs": uptime
                })),
            )
        }
        Err(err) => {
            tracing::warn!(uptime_secs = uptime, error = %err, "health check degraded, storage unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": now,
                    "uptime_secs": uptime
                })),
            )
        }
    }
}

pub async fn route_not_found() -> impl IntoResponse {
    ApiError::not_found("RouteNotFound", "Route not found")
}
