use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracker_core::dashboard::{DashboardStats, MilestoneOverview, SourceOverview};

use super::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "store": state.repo.store().describe(),
    }))
}

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.repo.dashboard())
}

pub async fn milestones(State(state): State<AppState>) -> Json<MilestoneOverview> {
    Json(state.repo.milestone_overview())
}

pub async fn sources(State(state): State<AppState>) -> Json<SourceOverview> {
    Json(state.repo.source_overview())
}
