//! Milestone ("deliverable") repository.

use super::{ensure_changed, EntityRepository, RepoResult};
use crate::model::milestone::{Milestone, MilestoneInput};
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const MILESTONE_SELECT_SQL: &str = "SELECT
    deliverable_id,
    name,
    start_date,
    end_date,
    complete,
    owner,
    project_id,
    description
FROM deliverables";

const ENTITY: &str = "Deliverable";

/// SQLite-backed milestone repository.
pub struct SqliteMilestoneRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMilestoneRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists milestones owned by one project, ordered by id.
    pub fn list_by_project(&self, project_id: EntityId) -> RepoResult<Vec<Milestone>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MILESTONE_SELECT_SQL} WHERE project_id = ?1 ORDER BY deliverable_id ASC;"
        ))?;
        let milestones = stmt
            .query_map([project_id], parse_milestone_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(milestones)
    }
}

impl EntityRepository for SqliteMilestoneRepository<'_> {
    type Input = MilestoneInput;
    type Record = Milestone;

    fn create(&self, input: &MilestoneInput) -> RepoResult<EntityId> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO deliverables (
                name,
                start_date,
                end_date,
                complete,
                owner,
                project_id,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                input.name.as_str(),
                input.start_date.as_str(),
                input.end_date.as_str(),
                input.complete,
                input.owner.as_str(),
                input.project_id,
                input.description.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Milestone>> {
        let milestone = self
            .conn
            .query_row(
                &format!("{MILESTONE_SELECT_SQL} WHERE deliverable_id = ?1;"),
                [id],
                parse_milestone_row,
            )
            .optional()?;
        Ok(milestone)
    }

    fn list(&self) -> RepoResult<Vec<Milestone>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MILESTONE_SELECT_SQL} ORDER BY deliverable_id ASC;"))?;
        let milestones = stmt
            .query_map([], parse_milestone_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(milestones)
    }

    fn update(&self, id: EntityId, input: &MilestoneInput) -> RepoResult<()> {
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE deliverables
             SET
                name = ?1,
                start_date = ?2,
                end_date = ?3,
                complete = ?4,
                owner = ?5,
                project_id = ?6,
                description = ?7
             WHERE deliverable_id = ?8;",
            params![
                input.name.as_str(),
                input.start_date.as_str(),
                input.end_date.as_str(),
                input.complete,
                input.owner.as_str(),
                input.project_id,
                input.description.as_deref(),
                id,
            ],
        )?;
        ensure_changed(changed, ENTITY, id)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM deliverables WHERE deliverable_id = ?1;", [id])?;
        ensure_changed(changed, ENTITY, id)
    }
}

fn parse_milestone_row(row: &Row<'_>) -> rusqlite::Result<Milestone> {
    Ok(Milestone {
        deliverable_id: row.get("deliverable_id")?,
        fields: MilestoneInput {
            name: row.get("name")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            complete: row.get("complete")?,
            owner: row.get("owner")?,
            project_id: row.get("project_id")?,
            description: row.get("description")?,
        },
    })
}
