//! Derived, read-only views: project summaries and risk reach.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use tracker_core::{
    DashboardService, EntityId, EntityRepository, ProjectSummary, SqliteRiskRepository,
};

/// `GET /api/dashboard`: one summary per project.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectSummary>>> {
    state.with_conn(|conn| Ok(Json(DashboardService::new(conn).dashboard()?)))
}

/// `GET /api/projects/{id}/summary`.
pub async fn project_summary(
    State(state): State<AppState>,
    Path(project_id): Path<EntityId>,
) -> ApiResult<Json<ProjectSummary>> {
    state.with_conn(|conn| Ok(Json(DashboardService::new(conn).project_summary(project_id)?)))
}

/// `GET /api/risks/{id}/projects`: ids of projects the risk reaches.
pub async fn risk_projects(
    State(state): State<AppState>,
    Path(risk_id): Path<EntityId>,
) -> ApiResult<Json<Vec<EntityId>>> {
    state.with_conn(|conn| {
        let risks = SqliteRiskRepository::new(conn);
        if risks.get(risk_id)?.is_none() {
            return Err(ApiError::NotFound("Risk not found".to_string()));
        }
        Ok(Json(risks.list_project_ids_for_risk(risk_id)?))
    })
}
