use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    service: String,
    version: &'static str,
    active_sessions: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.config.app.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        active_sessions: state.sessions.len(),
    })
}
