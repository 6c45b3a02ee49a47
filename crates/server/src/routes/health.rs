use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

/// Liveness probe backed by `DBService::ensure_live`.
pub async fn health(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<&'static str>>, ApiError> {
    state.db().ensure_live().await?;
    Ok(ResponseJson(ApiResponse::success("ok")))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
