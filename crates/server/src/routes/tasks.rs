use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::task::{Task, TaskRecord};
use serde::{Deserialize, Serialize};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveTasksRequest {
    pub tasks: Vec<TaskRecord>,
}

pub async fn get_tasks(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::load_for_project(&state.db().pool, &project_name).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

/// Whole-collection replace. An unknown project name is "nothing to do",
/// not an error, matching the delete-then-reinsert persistence contract.
pub async fn save_tasks(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
    Json(payload): Json<SaveTasksRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    tracing::debug!(
        "Saving {} task(s) for project '{}'",
        payload.tasks.len(),
        project_name
    );
    Task::replace_for_project(&state.db().pool, &project_name, &payload.tasks).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/projects/{name}/tasks", get(get_tasks).put(save_tasks))
}
