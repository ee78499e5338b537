//! JSON HTTP API over the project repository.

mod error;
mod milestones;
mod overview;
mod projects;
mod sources;
mod tasks;

use axum::{
    extract::rejection::JsonRejection,
    http::Method,
    routing::{get, post, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracker_core::ProjectRepository;

pub use error::{ApiProblem, ApiResult};

#[derive(Clone)]
pub struct AppState {
    pub repo: ProjectRepository,
}

pub fn create_router(repo: ProjectRepository) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    Router::new()
        .route("/health", get(overview::health))
        .route("/api/dashboard", get(overview::dashboard))
        .route("/api/milestones", get(overview::milestones))
        .route("/api/sources", get(overview::sources))
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/api/projects/{id}/milestones",
            post(milestones::add_milestone),
        )
        .route(
            "/api/projects/{id}/milestones/{milestone_id}",
            put(milestones::update_milestone).delete(milestones::delete_milestone),
        )
        .route(
            "/api/projects/{id}/milestones/{milestone_id}/tasks",
            post(tasks::add_task),
        )
        .route(
            "/api/projects/{id}/milestones/{milestone_id}/tasks/{task_id}",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route(
            "/api/projects/{id}/milestones/{milestone_id}/tasks/{task_id}/completion",
            put(tasks::set_task_completion),
        )
        .route("/api/projects/{id}/sources", post(sources::add_source))
        .route(
            "/api/projects/{id}/sources/{source_id}",
            put(sources::update_source).delete(sources::delete_source),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(AppState { repo })
}

/// Unwraps a JSON body, turning malformed input into a 400 problem.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(value)| value).map_err(ApiProblem::from)
}

fn require(value: &str, detail: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiProblem::validation(detail));
    }
    Ok(())
}
