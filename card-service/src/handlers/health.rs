use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 200 once the card store answers, 503 otherwise.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.cards.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Card store not ready");
        AppError::ServiceUnavailable
    })?;

    Ok((StatusCode::OK, Json(json!({ "status": "ready" }))))
}
