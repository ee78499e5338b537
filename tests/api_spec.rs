use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use research_tracker::api::create_router;
use research_tracker::models::*;
use research_tracker::ProjectRepository;

fn server() -> TestServer {
    TestServer::new(create_router(ProjectRepository::in_memory())).unwrap()
}

async fn create_study(server: &TestServer) -> Project {
    let response = server
        .post("/api/projects")
        .json(&json!({ "title": "Quantum Study", "description": "desc", "userId": "u1" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Project>()
}

#[tokio::test]
async fn health_reports_store() {
    let response = server().get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn lists_seeded_project() {
    let projects: Vec<Project> = server().get("/api/projects").await.json();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Example Research Project");
}

#[tokio::test]
async fn create_requires_title_and_user() {
    let server = server();

    let response = server
        .post("/api/projects")
        .json(&json!({ "title": "  ", "userId": "u1" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let problem: Value = response.json();
    assert_eq!(problem["status"], 400);
    assert!(problem["correlationId"].is_string());

    let response = server
        .post("/api/projects")
        .json(&json!({ "title": "No user" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_project_scenario() {
    let server = server();
    let project = create_study(&server).await;
    assert!(project.milestones.is_empty());
    assert_eq!(project.created_at, project.updated_at);

    let milestone: Milestone = server
        .post(&format!("/api/projects/{}/milestones", project.id))
        .json(&json!({ "title": "Lit Review", "status": "Not Started" }))
        .await
        .json();

    let task: Task = server
        .post(&format!(
            "/api/projects/{}/milestones/{}/tasks",
            project.id, milestone.id
        ))
        .json(&json!({ "description": "Find papers", "status": "To Do" }))
        .await
        .json();
    assert!(!task.completed);

    let response = server
        .put(&format!(
            "/api/projects/{}/milestones/{}/tasks/{}/completion",
            project.id, milestone.id, task.id
        ))
        .json(&json!({ "completed": true }))
        .await;
    response.assert_status_ok();

    let stored: Project = server
        .get(&format!("/api/projects/{}", project.id))
        .await
        .json();
    let stored_task = &stored.milestones[0].tasks[0];
    assert!(stored_task.completed);
    assert_eq!(stored_task.status, TaskStatus::Done);
    assert!(stored.updated_at > project.updated_at);
}

#[tokio::test]
async fn update_project_patches_fields() {
    let server = server();

    let updated: Project = server
        .put("/api/projects/1")
        .json(&json!({ "results": "Significant at p < 0.05" }))
        .await
        .json();

    assert_eq!(updated.results.as_deref(), Some("Significant at p < 0.05"));
    assert_eq!(updated.title, "Example Research Project");
}

#[tokio::test]
async fn milestone_replacement_keeps_done_tasks_completed() {
    let server = server();

    let updated: Project = server
        .put("/api/projects/1")
        .json(&json!({
            "milestones": [{
                "id": "m9",
                "title": "Replaced",
                "status": "In Progress",
                "tasks": [
                    { "id": "t9", "description": "Done already", "status": "Done", "completed": false },
                    { "id": "t10", "description": "Not yet", "status": "To Do", "completed": true }
                ]
            }]
        }))
        .await
        .json();

    let tasks = &updated.milestones[0].tasks;
    assert!(tasks[0].completed);
    assert!(!tasks[1].completed);

    let stats: Value = server.get("/api/dashboard").await.json();
    assert_eq!(stats["completedTasks"], 1);
}

#[tokio::test]
async fn missing_entities_are_404() {
    let server = server();

    server
        .get("/api/projects/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/api/projects/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .put("/api/projects/1/milestones/nope")
        .json(&json!({ "title": "x" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/api/projects/1/milestones/m1/tasks/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete("/api/projects/1/sources/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let projects: Vec<Project> = server.get("/api/projects").await.json();
    assert_eq!(projects.len(), 1);
}

#[tokio::test]
async fn deleting_milestone_drops_its_tasks() {
    let server = server();

    server
        .delete("/api/projects/1/milestones/m1")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let stats: Value = server.get("/api/dashboard").await.json();
    assert_eq!(stats["totalMilestones"], 1);
    assert_eq!(stats["totalTasks"], 2);
    assert_eq!(stats["completedTasks"], 0);
}

#[tokio::test]
async fn task_status_update_drives_completion() {
    let server = server();

    let task: Task = server
        .put("/api/projects/1/milestones/m1/tasks/t1")
        .json(&json!({ "status": "Updated" }))
        .await
        .json();
    assert_eq!(task.status, TaskStatus::Updated);
    assert!(!task.completed);
}

#[tokio::test]
async fn sources_round_trip_through_overview() {
    let server = server();

    let source: TheoreticalSource = server
        .post("/api/projects/1/sources")
        .json(&json!({ "type": "paper", "title": "Grover 1996" }))
        .await
        .json();

    let overview: Value = server.get("/api/sources").await.json();
    assert_eq!(overview["total"], 3);
    assert_eq!(overview["byType"][0]["type"], "paper");
    assert_eq!(overview["byType"][0]["count"], 2);

    server
        .delete(&format!("/api/projects/1/sources/{}", source.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn milestone_overview_splits_by_status() {
    let overview: Value = server().get("/api/milestones").await.json();
    assert_eq!(overview["completed"][0]["id"], "m1");
    assert_eq!(overview["upcoming"][0]["projectTitle"], "Example Research Project");
}

#[tokio::test]
async fn delete_project_then_gone() {
    let server = server();
    let project = create_study(&server).await;

    server
        .delete(&format!("/api/projects/{}", project.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/projects/{}", project.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
