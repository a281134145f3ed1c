use axum::body::to_bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tracker_api::handlers::{dashboard, entities, health, links};
use tracker_api::{router, ApiError, AppState};
use tracker_core::db::open_db_in_memory;
use tracker_core::{EntityId, Milestone, Project, ProjectStatus, Risk, Task};

fn state() -> AppState {
    AppState::new(open_db_in_memory().unwrap())
}

fn project_body(name: &str) -> Value {
    json!({
        "name": name,
        "start_date": "2024-01-01",
        "end_date": "2024-12-31",
        "owner": "pmo",
    })
}

fn task_body(project_id: EntityId, progress: f64) -> Value {
    json!({
        "name": "build",
        "start_date": "2024-01-01",
        "end_date": "2024-01-11",
        "progress": progress,
        "project_id": project_id,
    })
}

fn risk_body() -> Value {
    json!({
        "name": "Supplier delay",
        "pre_impact": 3,
        "post_impact": 2,
        "pre_likelihood": 4,
        "post_likelihood": 1,
        "preparedness": 2,
        "date": "2024-01-15",
    })
}

async fn create<E: entities::EntityEndpoint>(state: &AppState, body: Value) -> EntityId {
    let (status, Json(response)) = entities::create::<E>(State(state.clone()), Json(body))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    response["id"].as_i64().unwrap()
}

async fn error_body(err: ApiError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn router_builds_without_route_conflicts() {
    let _ = router(state());
}

#[tokio::test]
async fn health_reports_version() {
    let Json(body) = health::health().await;
    assert_eq!(body.status, "ok");
    assert_eq!(body.version, tracker_core::core_version());
}

#[tokio::test]
async fn project_lifecycle_messages() {
    let state = state();

    let (status, Json(created)) =
        entities::create::<Project>(State(state.clone()), Json(project_body("Apollo")))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Project created successfully");
    let id = created["id"].as_i64().unwrap();

    let Json(fetched) = entities::fetch::<Project>(State(state.clone()), Path(id))
        .await
        .unwrap();
    assert_eq!(fetched["project_id"], id);
    assert_eq!(fetched["name"], "Apollo");
    assert_eq!(fetched["description"], Value::Null);

    let Json(updated) = entities::update::<Project>(
        State(state.clone()),
        Path(id),
        Json(project_body("Apollo II")),
    )
    .await
    .unwrap();
    assert_eq!(updated["message"], "Project updated successfully");

    let Json(listed) = entities::list::<Project>(State(state.clone())).await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], "Apollo II");

    let Json(deleted) = entities::remove::<Project>(State(state.clone()), Path(id))
        .await
        .unwrap();
    assert_eq!(deleted["message"], "Project deleted successfully");

    let err = entities::fetch::<Project>(State(state), Path(id))
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Project not found" }));
}

#[tokio::test]
async fn invalid_body_is_a_bad_request() {
    let state = state();
    let mut body = project_body("Apollo");
    body["start_date"] = json!("January");

    let err = entities::create::<Project>(State(state), Json(body))
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or missing start_date");
}

#[tokio::test]
async fn deleting_missing_project_is_not_found() {
    let err = entities::remove::<Project>(State(state()), Path(41))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_without_duration_gets_it_from_dates() {
    let state = state();
    let project_id = create::<Project>(&state, project_body("Apollo")).await;
    let task_id = create::<Task>(&state, task_body(project_id, 30.0)).await;

    let Json(task) = entities::fetch::<Task>(State(state), Path(task_id))
        .await
        .unwrap();
    assert_eq!(task["duration"], 10.0);
    assert_eq!(task["progress"], 30.0);
}

#[tokio::test]
async fn task_for_unknown_project_is_a_bad_request() {
    let err = entities::create::<Task>(State(state()), Json(task_body(999, 10.0)))
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("FOREIGN KEY"));
}

#[tokio::test]
async fn milestones_answer_as_deliverables() {
    let state = state();
    let body = json!({
        "name": "Beta",
        "start_date": "2024-02-01",
        "end_date": "2024-02-01",
        "complete": 0,
        "owner": "qa",
        "project_id": create::<Project>(&state, project_body("Apollo")).await,
    });

    let (_, Json(created)) = entities::create::<Milestone>(State(state), Json(body))
        .await
        .unwrap();
    assert_eq!(created["message"], "Deliverable created successfully");
}

#[tokio::test]
async fn link_endpoints_create_rekey_and_delete() {
    let state = state();
    let project_id = create::<Project>(&state, project_body("Apollo")).await;
    let first = create::<Task>(&state, task_body(project_id, 0.0)).await;
    let second = create::<Task>(&state, task_body(project_id, 0.0)).await;
    let risk_id = create::<Risk>(&state, risk_body()).await;

    let (status, Json(created)) = links::create_link::<links::TaskRisks>(
        State(state.clone()),
        Json(json!({ "task_id": first, "risk_id": risk_id })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Task risk created successfully");

    let Json(updated) = links::rekey_link::<links::TaskRisks>(
        State(state.clone()),
        Path((first, risk_id)),
        Json(json!({ "task_id": second, "risk_id": risk_id })),
    )
    .await
    .unwrap();
    assert_eq!(updated["message"], "Task risk updated successfully");

    let Json(listed) = links::list_links::<links::TaskRisks>(State(state.clone()))
        .await
        .unwrap();
    assert_eq!(listed, json!([{ "task_id": second, "risk_id": risk_id }]));

    let err = links::fetch_link::<links::TaskRisks>(State(state.clone()), Path((first, risk_id)))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::NotFound("Task risk not found".to_string()));

    links::remove_link::<links::TaskRisks>(State(state.clone()), Path((second, risk_id)))
        .await
        .unwrap();
    let Json(listed) = links::list_links::<links::TaskRisks>(State(state))
        .await
        .unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn dependency_endpoints_reject_self_edges() {
    let state = state();
    let project_id = create::<Project>(&state, project_body("Apollo")).await;
    let task_id = create::<Task>(&state, task_body(project_id, 0.0)).await;

    let err = links::create_dependency::<links::TaskDependencies>(
        State(state),
        Json(json!({
            "source_id": task_id,
            "target_id": task_id,
            "dependency_type": "FS",
            "lag": 0,
        })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dependency_endpoints_roundtrip() {
    let state = state();
    let project_id = create::<Project>(&state, project_body("Apollo")).await;
    let a = create::<Task>(&state, task_body(project_id, 0.0)).await;
    let b = create::<Task>(&state, task_body(project_id, 0.0)).await;

    let (_, Json(created)) = links::create_dependency::<links::TaskDependencies>(
        State(state.clone()),
        Json(json!({
            "source_id": a,
            "target_id": b,
            "dependency_type": "FS",
            "lag": 1.5,
        })),
    )
    .await
    .unwrap();
    assert_eq!(created["message"], "Task dependency created successfully");

    let Json(fetched) =
        links::fetch_dependency::<links::TaskDependencies>(State(state.clone()), Path((a, b)))
            .await
            .unwrap();
    assert_eq!(fetched["dependency_type"], "FS");
    assert_eq!(fetched["lag"], 1.5);

    let Json(deleted) =
        links::remove_dependency::<links::TaskDependencies>(State(state), Path((a, b)))
            .await
            .unwrap();
    assert_eq!(deleted["message"], "Task dependency deleted successfully");
}

#[tokio::test]
async fn summary_and_risk_reach() {
    let state = state();
    let project_id = create::<Project>(&state, project_body("Apollo")).await;
    let task_id = create::<Task>(&state, task_body(project_id, 100.0)).await;
    let risk_id = create::<Risk>(&state, risk_body()).await;
    links::create_link::<links::TaskRisks>(
        State(state.clone()),
        Json(json!({ "task_id": task_id, "risk_id": risk_id })),
    )
    .await
    .unwrap();

    let Json(summary) = dashboard::project_summary(State(state.clone()), Path(project_id))
        .await
        .unwrap();
    assert_eq!(summary.name, "Apollo");
    assert_eq!(summary.progress, 100);
    assert_eq!(summary.status, ProjectStatus::Ahead);

    let Json(rows) = dashboard::dashboard(State(state.clone())).await.unwrap();
    assert_eq!(rows.len(), 1);

    let Json(reach) = dashboard::risk_projects(State(state.clone()), Path(risk_id))
        .await
        .unwrap();
    assert_eq!(reach, vec![project_id]);

    let err = dashboard::risk_projects(State(state), Path(risk_id + 1))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}
