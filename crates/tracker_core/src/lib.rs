//! Core domain logic for the project tracker.
//! This crate owns the store schema, entity CRUD and derived project metrics.

pub mod db;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use metrics::{
    calculate_expected_progress, calculate_expected_progress_at, calculate_project_progress,
    classify_progress, get_project_status, get_project_status_at, MilestoneSample,
    MilestoneSnapshot, ProjectMetrics, ProjectStatus, TaskSample, TaskSnapshot,
};
pub use model::link::{Dependency, DependencyScope, Link, LinkKind};
pub use model::milestone::{Milestone, MilestoneInput};
pub use model::project::{Project, ProjectInput};
pub use model::risk::{Risk, RiskInput};
pub use model::task::{Task, TaskInput};
pub use model::team::{Resource, ResourceInput, Team, TeamInput};
pub use model::{EntityId, ValidationError};
pub use repo::link_repo::{LinkRepository, SqliteLinkRepository};
pub use repo::milestone_repo::SqliteMilestoneRepository;
pub use repo::project_repo::SqliteProjectRepository;
pub use repo::risk_repo::SqliteRiskRepository;
pub use repo::task_repo::SqliteTaskRepository;
pub use repo::team_repo::{SqliteResourceRepository, SqliteTeamRepository};
pub use repo::{EntityRepository, RepoError, RepoResult};
pub use service::dashboard_service::{DashboardService, ProjectSummary};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
