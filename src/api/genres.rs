use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, GenresResponse};

/// `GET /v1/genres`
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenresResponse>, ApiError> {
    let genres = state.movies().list_genres().await?;
    Ok(Json(GenresResponse { genres }))
}
