use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracker_core::models::*;

use super::{body, require, ApiProblem, ApiResult, AppState};

pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.repo.get_all())
}

pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let input = body(payload)?;
    if input.title.trim().is_empty() || input.user_id.trim().is_empty() {
        return Err(ApiProblem::validation("Title and userId are required"));
    }

    let project = state.repo.create(input);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    state
        .repo
        .get_by_id(&id)
        .map(Json)
        .ok_or_else(|| project_not_found(&id))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProjectInput>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let input = body(payload)?;
    if let Some(title) = &input.title {
        require(title, "Title cannot be empty")?;
    }

    state
        .repo
        .update(&id, input)
        .map(Json)
        .ok_or_else(|| project_not_found(&id))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.repo.delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(project_not_found(&id))
    }
}

pub(super) fn project_not_found(id: &str) -> ApiProblem {
    ApiProblem::not_found(format!("Project {} not found", id))
}
