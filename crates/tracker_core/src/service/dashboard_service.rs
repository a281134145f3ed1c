//! Project dashboard use-case service.
//!
//! # Responsibility
//! - Load one project's tasks and milestones and derive its metrics.
//! - Produce the per-project rows shown on the dashboard.
//!
//! # Invariants
//! - Metrics only ever see the rows whose `project_id` matches.
//! - All rows of one dashboard call share the same `now`.

use crate::metrics::{project_metrics_at, ProjectStatus};
use crate::model::project::Project;
use crate::model::EntityId;
use crate::repo::milestone_repo::SqliteMilestoneRepository;
use crate::repo::project_repo::SqliteProjectRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::{EntityRepository, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::Connection;
use serde::Serialize;

/// Derived dashboard row for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project_id: EntityId,
    pub name: String,
    pub task_count: usize,
    pub milestone_count: usize,
    /// Weighted actual completion, 0..=100 for sane input.
    pub progress: i64,
    /// Time-based expectation at the evaluation instant.
    pub expected_progress: i64,
    pub status: ProjectStatus,
}

/// Dashboard service over the SQLite repositories.
pub struct DashboardService<'conn> {
    projects: SqliteProjectRepository<'conn>,
    tasks: SqliteTaskRepository<'conn>,
    milestones: SqliteMilestoneRepository<'conn>,
}

impl<'conn> DashboardService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            projects: SqliteProjectRepository::new(conn),
            tasks: SqliteTaskRepository::new(conn),
            milestones: SqliteMilestoneRepository::new(conn),
        }
    }

    /// Summary of one project as of the wall clock.
    pub fn project_summary(&self, project_id: EntityId) -> RepoResult<ProjectSummary> {
        self.project_summary_at(project_id, Utc::now())
    }

    /// Summary of one project as of `now`.
    ///
    /// Returns `NotFound` when the project does not exist.
    pub fn project_summary_at(
        &self,
        project_id: EntityId,
        now: DateTime<Utc>,
    ) -> RepoResult<ProjectSummary> {
        let project = self
            .projects
            .get(project_id)?
            .ok_or_else(|| RepoError::not_found("Project", project_id))?;
        self.summarize(project, now)
    }

    /// Summaries of every project as of the wall clock.
    pub fn dashboard(&self) -> RepoResult<Vec<ProjectSummary>> {
        self.dashboard_at(Utc::now())
    }

    /// Summaries of every project, ordered by project id.
    pub fn dashboard_at(&self, now: DateTime<Utc>) -> RepoResult<Vec<ProjectSummary>> {
        self.projects
            .list()?
            .into_iter()
            .map(|project| self.summarize(project, now))
            .collect()
    }

    fn summarize(&self, project: Project, now: DateTime<Utc>) -> RepoResult<ProjectSummary> {
        let tasks = self.tasks.list_by_project(project.project_id)?;
        let milestones = self.milestones.list_by_project(project.project_id)?;
        let metrics = project_metrics_at(&tasks, &milestones, now);

        debug!(
            "event=project_summary module=service status=ok project_id={} tasks={} milestones={} progress={} expected={} project_status={}",
            project.project_id,
            tasks.len(),
            milestones.len(),
            metrics.progress,
            metrics.expected_progress,
            metrics.status
        );

        Ok(ProjectSummary {
            project_id: project.project_id,
            name: project.fields.name,
            task_count: tasks.len(),
            milestone_count: milestones.len(),
            progress: metrics.progress,
            expected_progress: metrics.expected_progress,
            status: metrics.status,
        })
    }
}
