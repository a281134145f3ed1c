//! Junction-table endpoints keyed by two ids in the path.

use super::entities::to_json;
use super::message;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tracker_core::{
    Dependency, DependencyScope, EntityId, Link, LinkKind, LinkRepository, SqliteLinkRepository,
};

/// Marker for one pair-only junction table.
pub trait LinkEndpoint: Send + Sync + 'static {
    const KIND: LinkKind;
}

/// Marker for one dependency table.
pub trait DependencyEndpoint: Send + Sync + 'static {
    const SCOPE: DependencyScope;
}

pub struct Assignments;
pub struct DeliverableTasks;
pub struct TaskRisks;
pub struct ProjectRisks;
pub struct TaskDependencies;
pub struct DeliverableDependencies;

impl LinkEndpoint for Assignments {
    const KIND: LinkKind = LinkKind::Assignment;
}

impl LinkEndpoint for DeliverableTasks {
    const KIND: LinkKind = LinkKind::MilestoneTask;
}

impl LinkEndpoint for TaskRisks {
    const KIND: LinkKind = LinkKind::TaskRisk;
}

impl LinkEndpoint for ProjectRisks {
    const KIND: LinkKind = LinkKind::ProjectRisk;
}

impl DependencyEndpoint for TaskDependencies {
    const SCOPE: DependencyScope = DependencyScope::Task;
}

impl DependencyEndpoint for DeliverableDependencies {
    const SCOPE: DependencyScope = DependencyScope::Milestone;
}

type PairPath = Path<(EntityId, EntityId)>;

pub fn link_routes<L: LinkEndpoint>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(list_links::<L>).post(create_link::<L>))
        .route(
            &format!("{base}/{{left}}/{{right}}"),
            get(fetch_link::<L>)
                .put(rekey_link::<L>)
                .delete(remove_link::<L>),
        )
}

pub fn dependency_routes<D: DependencyEndpoint>(
    router: Router<AppState>,
    base: &str,
) -> Router<AppState> {
    router
        .route(base, get(list_dependencies::<D>).post(create_dependency::<D>))
        .route(
            &format!("{base}/{{source_id}}/{{target_id}}"),
            get(fetch_dependency::<D>)
                .put(update_dependency::<D>)
                .delete(remove_dependency::<D>),
        )
}

pub async fn list_links<L: LinkEndpoint>(
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| {
        let links = SqliteLinkRepository::new(conn).list_links(L::KIND)?;
        Ok(Json(to_json(&links)?))
    })
}

pub async fn fetch_link<L: LinkEndpoint>(
    State(state): State<AppState>,
    Path((left, right)): PairPath,
) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| {
        let link = SqliteLinkRepository::new(conn)
            .get_link(L::KIND, left, right)?
            .ok_or_else(|| ApiError::NotFound(format!("{} not found", L::KIND.label())))?;
        Ok(Json(to_json(&link)?))
    })
}

pub async fn create_link<L: LinkEndpoint>(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let link = Link::from_json(L::KIND, &body)?;
    state.with_conn(|conn| Ok(SqliteLinkRepository::new(conn).create_link(&link)?))?;
    Ok((
        StatusCode::CREATED,
        Json(message(L::KIND.label(), "created")),
    ))
}

/// Moves the row at the path keys to the keys in the body.
pub async fn rekey_link<L: LinkEndpoint>(
    State(state): State<AppState>,
    Path((left, right)): PairPath,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let replacement = Link::from_json(L::KIND, &body)?;
    let current = Link::new(L::KIND, left, right);
    state.with_conn(|conn| {
        Ok(SqliteLinkRepository::new(conn).rekey_link(&current, &replacement)?)
    })?;
    Ok(Json(message(L::KIND.label(), "updated")))
}

pub async fn remove_link<L: LinkEndpoint>(
    State(state): State<AppState>,
    Path((left, right)): PairPath,
) -> ApiResult<Json<Value>> {
    let link = Link::new(L::KIND, left, right);
    state.with_conn(|conn| Ok(SqliteLinkRepository::new(conn).delete_link(&link)?))?;
    Ok(Json(message(L::KIND.label(), "deleted")))
}

pub async fn list_dependencies<D: DependencyEndpoint>(
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| {
        let dependencies = SqliteLinkRepository::new(conn).list_dependencies(D::SCOPE)?;
        Ok(Json(to_json(&dependencies)?))
    })
}

pub async fn fetch_dependency<D: DependencyEndpoint>(
    State(state): State<AppState>,
    Path((source_id, target_id)): PairPath,
) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| {
        let dependency = SqliteLinkRepository::new(conn)
            .get_dependency(D::SCOPE, source_id, target_id)?
            .ok_or_else(|| ApiError::NotFound(format!("{} not found", D::SCOPE.label())))?;
        Ok(Json(to_json(&dependency)?))
    })
}

pub async fn create_dependency<D: DependencyEndpoint>(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let dependency = Dependency::from_json(&body)?;
    state.with_conn(|conn| {
        Ok(SqliteLinkRepository::new(conn).create_dependency(D::SCOPE, &dependency)?)
    })?;
    Ok((
        StatusCode::CREATED,
        Json(message(D::SCOPE.label(), "created")),
    ))
}

pub async fn update_dependency<D: DependencyEndpoint>(
    State(state): State<AppState>,
    Path((source_id, target_id)): PairPath,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let dependency = Dependency::from_json(&body)?;
    state.with_conn(|conn| {
        Ok(SqliteLinkRepository::new(conn).update_dependency(
            D::SCOPE,
            source_id,
            target_id,
            &dependency,
        )?)
    })?;
    Ok(Json(message(D::SCOPE.label(), "updated")))
}

pub async fn remove_dependency<D: DependencyEndpoint>(
    State(state): State<AppState>,
    Path((source_id, target_id)): PairPath,
) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| {
        Ok(SqliteLinkRepository::new(conn).delete_dependency(D::SCOPE, source_id, target_id)?)
    })?;
    Ok(Json(message(D::SCOPE.label(), "deleted")))
}
