use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracker_core::models::*;

use super::{body, require, ApiProblem, ApiResult, AppState};

pub async fn add_source(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateSourceInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TheoreticalSource>)> {
    let input = body(payload)?;
    require(&input.title, "Source title is required")?;

    state
        .repo
        .add_theoretical_source(&id, input)
        .map(|s| (StatusCode::CREATED, Json(s)))
        .ok_or_else(|| super::projects::project_not_found(&id))
}

pub async fn update_source(
    State(state): State<AppState>,
    Path((id, source_id)): Path<(String, String)>,
    payload: Result<Json<UpdateSourceInput>, JsonRejection>,
) -> ApiResult<Json<TheoreticalSource>> {
    let input = body(payload)?;
    if let Some(title) = &input.title {
        require(title, "Source title cannot be empty")?;
    }

    state
        .repo
        .update_theoretical_source(&id, &source_id, input)
        .map(Json)
        .ok_or_else(|| source_not_found(&id, &source_id))
}

pub async fn delete_source(
    State(state): State<AppState>,
    Path((id, source_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    if state.repo.delete_theoretical_source(&id, &source_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(source_not_found(&id, &source_id))
    }
}

fn source_not_found(id: &str, source_id: &str) -> ApiProblem {
    ApiProblem::not_found(format!("Source {} not found in project {}", source_id, id))
}
