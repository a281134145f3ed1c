//! HTTP API over the tracker core.
//!
//! # Responsibility
//! - Expose entity, junction and derived-metrics endpoints under `/api`.
//! - Translate core errors into `{ "error": ... }` JSON responses.
//!
//! # Invariants
//! - Handlers never hold the connection lock across an `.await`.
//! - Every request is logged once by the request middleware.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::routing::get;
use axum::Router;
use handlers::{dashboard, entities, health, links};
use tracker_core::{Milestone, Project, Resource, Risk, Task, Team};

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Builds the full `/api` router bound to `state`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/dashboard", get(dashboard::dashboard))
        .route(
            "/api/projects/{id}/summary",
            get(dashboard::project_summary),
        )
        .route("/api/risks/{id}/projects", get(dashboard::risk_projects));

    let api = entities::routes::<Project>(api, "/api/projects");
    let api = entities::routes::<Task>(api, "/api/tasks");
    let api = entities::routes::<Milestone>(api, "/api/deliverables");
    let api = entities::routes::<Risk>(api, "/api/risks");
    let api = entities::routes::<Team>(api, "/api/teams");
    let api = entities::routes::<Resource>(api, "/api/resources");

    let api = links::link_routes::<links::Assignments>(api, "/api/assignments");
    let api = links::link_routes::<links::DeliverableTasks>(api, "/api/deliverabletasks");
    let api = links::link_routes::<links::TaskRisks>(api, "/api/taskrisks");
    let api = links::link_routes::<links::ProjectRisks>(api, "/api/projectrisks");
    let api =
        links::dependency_routes::<links::TaskDependencies>(api, "/api/taskdependencies");
    let api = links::dependency_routes::<links::DeliverableDependencies>(
        api,
        "/api/deliverabledependencies",
    );

    api.layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
