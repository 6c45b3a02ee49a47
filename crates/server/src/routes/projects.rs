use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::models::project::{CreateProject, Project, ProjectError, ProjectWithTaskCounts};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn get_projects(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ProjectWithTaskCounts>>>, ApiError> {
    let projects = Project::find_all_with_task_counts(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest(
            "Project name cannot be empty".to_string(),
        ));
    }

    tracing::debug!("Creating project '{}'", name);
    match Project::create(&state.db().pool, &CreateProject { name }).await {
        Ok(project) => Ok(ResponseJson(ApiResponse::success(project))),
        Err(ProjectError::DuplicateName(name)) => Ok(ResponseJson(ApiResponse::error(format!(
            "Project '{}' already exists",
            name
        )))),
        Err(e) => Err(e.into()),
    }
}

/// Deleting an unknown name succeeds: the caller's view may be stale and
/// there is nothing left to remove either way.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows_affected = Project::delete_by_name(&state.db().pool, &name).await?;
    if rows_affected == 0 {
        tracing::debug!("delete of unknown project '{}' ignored", name);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(get_projects).post(create_project))
        .route("/projects/{name}", delete(delete_project))
}
