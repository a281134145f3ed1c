//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define CRUD contracts per entity family and for junction tables.
//! - Isolate SQL details from service orchestration and the HTTP layer.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Update and delete report `NotFound` when no row matched.
//! - List results are ordered by primary key ascending.

use crate::db::DbError;
use crate::model::{EntityId, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod link_repo;
pub mod milestone_repo;
pub mod project_repo;
pub mod risk_repo;
pub mod task_repo;
pub mod team_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// No row matched. `entity` is a display label such as `Project`.
    NotFound {
        entity: &'static str,
        key: String,
    },
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, .. } => write!(f, "{entity} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract shared by every entity table.
///
/// `update` is a full replacement of the writable fields.
pub trait EntityRepository {
    type Input;
    type Record;

    fn create(&self, input: &Self::Input) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Option<Self::Record>>;
    fn list(&self) -> RepoResult<Vec<Self::Record>>;
    fn update(&self, id: EntityId, input: &Self::Input) -> RepoResult<()>;
    fn delete(&self, id: EntityId) -> RepoResult<()>;
}

pub(crate) fn ensure_changed(
    changed: usize,
    entity: &'static str,
    key: impl Display,
) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::not_found(entity, key));
    }
    Ok(())
}
