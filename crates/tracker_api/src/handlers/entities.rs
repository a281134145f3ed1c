//! Generic CRUD endpoints for the six entity tables.
//!
//! Each entity plugs in through `EntityEndpoint`; the five handlers are
//! shared and instantiated per record type in the router.

use super::message;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use tracker_core::model::ValidationResult;
use tracker_core::{
    EntityId, EntityRepository, Milestone, MilestoneInput, Project, ProjectInput, Resource,
    ResourceInput, Risk, RiskInput, SqliteMilestoneRepository, SqliteProjectRepository,
    SqliteResourceRepository, SqliteRiskRepository, SqliteTaskRepository, SqliteTeamRepository,
    Task, TaskInput, Team, TeamInput,
};

/// Binds a record type to its repository and request parser.
pub trait EntityEndpoint: Send + Sync + 'static {
    /// Name used in response messages, e.g. `Deliverable`.
    const LABEL: &'static str;

    type Input;
    type Record: Serialize;
    type Repo<'conn>: EntityRepository<Input = Self::Input, Record = Self::Record>;

    fn repo(conn: &Connection) -> Self::Repo<'_>;
    fn parse(body: &Value) -> ValidationResult<Self::Input>;
}

/// Mounts list/create on `base` and get/update/delete on `base/{id}`.
pub fn routes<E: EntityEndpoint>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(list::<E>).post(create::<E>))
        .route(
            &format!("{base}/{{id}}"),
            get(fetch::<E>).put(update::<E>).delete(remove::<E>),
        )
}

pub async fn list<E: EntityEndpoint>(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| {
        let records = E::repo(conn).list()?;
        Ok(Json(to_json(&records)?))
    })
}

pub async fn fetch<E: EntityEndpoint>(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| {
        let record = E::repo(conn)
            .get(id)?
            .ok_or_else(|| ApiError::NotFound(format!("{} not found", E::LABEL)))?;
        Ok(Json(to_json(&record)?))
    })
}

pub async fn create<E: EntityEndpoint>(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let input = E::parse(&body)?;
    let id = state.with_conn(|conn| Ok(E::repo(conn).create(&input)?))?;

    let mut response = message(E::LABEL, "created");
    response["id"] = json!(id);
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update<E: EntityEndpoint>(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let input = E::parse(&body)?;
    state.with_conn(|conn| Ok(E::repo(conn).update(id, &input)?))?;
    Ok(Json(message(E::LABEL, "updated")))
}

pub async fn remove<E: EntityEndpoint>(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> ApiResult<Json<Value>> {
    state.with_conn(|conn| Ok(E::repo(conn).delete(id)?))?;
    Ok(Json(message(E::LABEL, "deleted")))
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|err| ApiError::Internal(err.to_string()))
}

impl EntityEndpoint for Project {
    const LABEL: &'static str = "Project";
    type Input = ProjectInput;
    type Record = Project;
    type Repo<'conn> = SqliteProjectRepository<'conn>;

    fn repo(conn: &Connection) -> Self::Repo<'_> {
        SqliteProjectRepository::new(conn)
    }

    fn parse(body: &Value) -> ValidationResult<ProjectInput> {
        ProjectInput::from_json(body)
    }
}

impl EntityEndpoint for Task {
    const LABEL: &'static str = "Task";
    type Input = TaskInput;
    type Record = Task;
    type Repo<'conn> = SqliteTaskRepository<'conn>;

    fn repo(conn: &Connection) -> Self::Repo<'_> {
        SqliteTaskRepository::new(conn)
    }

    fn parse(body: &Value) -> ValidationResult<TaskInput> {
        TaskInput::from_json(body)
    }
}

impl EntityEndpoint for Milestone {
    const LABEL: &'static str = "Deliverable";
    type Input = MilestoneInput;
    type Record = Milestone;
    type Repo<'conn> = SqliteMilestoneRepository<'conn>;

    fn repo(conn: &Connection) -> Self::Repo<'_> {
        SqliteMilestoneRepository::new(conn)
    }

    fn parse(body: &Value) -> ValidationResult<MilestoneInput> {
        MilestoneInput::from_json(body)
    }
}

impl EntityEndpoint for Risk {
    const LABEL: &'static str = "Risk";
    type Input = RiskInput;
    type Record = Risk;
    type Repo<'conn> = SqliteRiskRepository<'conn>;

    fn repo(conn: &Connection) -> Self::Repo<'_> {
        SqliteRiskRepository::new(conn)
    }

    fn parse(body: &Value) -> ValidationResult<RiskInput> {
        RiskInput::from_json(body)
    }
}

impl EntityEndpoint for Team {
    const LABEL: &'static str = "Team";
    type Input = TeamInput;
    type Record = Team;
    type Repo<'conn> = SqliteTeamRepository<'conn>;

    fn repo(conn: &Connection) -> Self::Repo<'_> {
        SqliteTeamRepository::new(conn)
    }

    fn parse(body: &Value) -> ValidationResult<TeamInput> {
        TeamInput::from_json(body)
    }
}

impl EntityEndpoint for Resource {
    const LABEL: &'static str = "Resource";
    type Input = ResourceInput;
    type Record = Resource;
    type Repo<'conn> = SqliteResourceRepository<'conn>;

    fn repo(conn: &Connection) -> Self::Repo<'_> {
        SqliteResourceRepository::new(conn)
    }

    fn parse(body: &Value) -> ValidationResult<ResourceInput> {
        ResourceInput::from_json(body)
    }
}
