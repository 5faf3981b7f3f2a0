use axum::{Json, extract::State};
use std::sync::Arc;

use super::{AppState, StatusResponse};

/// `GET /status`
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Available",
        environment: state.config().general.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
