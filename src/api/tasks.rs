use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracker_core::models::*;

use super::{body, require, ApiProblem, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CompletionInput {
    pub completed: bool,
}

pub async fn add_task(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(String, String)>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let input = body(payload)?;
    require(&input.description, "Task description is required")?;

    state
        .repo
        .add_task(&id, &milestone_id, input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .ok_or_else(|| super::milestones::milestone_not_found(&id, &milestone_id))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path((id, milestone_id, task_id)): Path<(String, String, String)>,
    payload: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let input = body(payload)?;
    if let Some(description) = &input.description {
        require(description, "Task description cannot be empty")?;
    }

    state
        .repo
        .update_task(&id, &milestone_id, &task_id, input)
        .map(Json)
        .ok_or_else(|| task_not_found(&milestone_id, &task_id))
}

pub async fn set_task_completion(
    State(state): State<AppState>,
    Path((id, milestone_id, task_id)): Path<(String, String, String)>,
    payload: Result<Json<CompletionInput>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let input = body(payload)?;

    state
        .repo
        .set_task_completion(&id, &milestone_id, &task_id, input.completed)
        .map(Json)
        .ok_or_else(|| task_not_found(&milestone_id, &task_id))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path((id, milestone_id, task_id)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    if state.repo.delete_task(&id, &milestone_id, &task_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(task_not_found(&milestone_id, &task_id))
    }
}

fn task_not_found(milestone_id: &str, task_id: &str) -> ApiProblem {
    ApiProblem::not_found(format!(
        "Task {} not found in milestone {}",
        task_id, milestone_id
    ))
}
