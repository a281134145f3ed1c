//! Project repository.
//!
//! # Invariants
//! - Deleting a project leaves its tasks and milestones in place with
//!   `project_id = NULL` (enforced by `ON DELETE SET NULL`).
//! - Risk links of a deleted project are removed by cascade.

use super::{ensure_changed, EntityRepository, RepoResult};
use crate::model::project::{Project, ProjectInput};
use crate::model::EntityId;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    name,
    start_date,
    end_date,
    owner,
    description
FROM projects";

const ENTITY: &str = "Project";

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository for SqliteProjectRepository<'_> {
    type Input = ProjectInput;
    type Record = Project;

    fn create(&self, input: &ProjectInput) -> RepoResult<EntityId> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO projects (name, start_date, end_date, owner, description)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                input.name.as_str(),
                input.start_date.as_str(),
                input.end_date.as_str(),
                input.owner.as_str(),
                input.description.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Project>> {
        let project = self
            .conn
            .query_row(
                &format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"),
                [id],
                parse_project_row,
            )
            .optional()?;
        Ok(project)
    }

    fn list(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_id ASC;"))?;
        let projects = stmt
            .query_map([], parse_project_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    fn update(&self, id: EntityId, input: &ProjectInput) -> RepoResult<()> {
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                start_date = ?2,
                end_date = ?3,
                owner = ?4,
                description = ?5
             WHERE project_id = ?6;",
            params![
                input.name.as_str(),
                input.start_date.as_str(),
                input.end_date.as_str(),
                input.owner.as_str(),
                input.description.as_deref(),
                id,
            ],
        )?;
        ensure_changed(changed, ENTITY, id)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE project_id = ?1;", [id])?;
        ensure_changed(changed, ENTITY, id)?;
        info!("event=project_delete module=repo status=ok project_id={id}");
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        project_id: row.get("project_id")?,
        fields: ProjectInput {
            name: row.get("name")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            owner: row.get("owner")?,
            description: row.get("description")?,
        },
    })
}
