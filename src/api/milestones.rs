use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracker_core::models::*;

use super::{body, require, ApiProblem, ApiResult, AppState};

pub async fn add_milestone(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateMilestoneInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Milestone>)> {
    let input = body(payload)?;
    require(&input.title, "Milestone title is required")?;

    state
        .repo
        .add_milestone(&id, input)
        .map(|m| (StatusCode::CREATED, Json(m)))
        .ok_or_else(|| super::projects::project_not_found(&id))
}

pub async fn update_milestone(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(String, String)>,
    payload: Result<Json<UpdateMilestoneInput>, JsonRejection>,
) -> ApiResult<Json<Milestone>> {
    let input = body(payload)?;
    if let Some(title) = &input.title {
        require(title, "Milestone title cannot be empty")?;
    }

    state
        .repo
        .update_milestone(&id, &milestone_id, input)
        .map(Json)
        .ok_or_else(|| milestone_not_found(&id, &milestone_id))
}

pub async fn delete_milestone(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    if state.repo.delete_milestone(&id, &milestone_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(milestone_not_found(&id, &milestone_id))
    }
}

pub(super) fn milestone_not_found(id: &str, milestone_id: &str) -> ApiProblem {
    ApiProblem::not_found(format!(
        "Milestone {} not found in project {}",
        milestone_id, id
    ))
}
