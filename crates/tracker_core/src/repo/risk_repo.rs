//! Risk repository.

use super::{ensure_changed, EntityRepository, RepoResult};
use crate::model::risk::{Risk, RiskInput};
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const RISK_SELECT_SQL: &str = "SELECT
    risk_id,
    name,
    description,
    pre_impact,
    post_impact,
    pre_likelihood,
    post_likelihood,
    pre_score,
    post_score,
    preparedness,
    date
FROM risks";

const ENTITY: &str = "Risk";

/// SQLite-backed risk repository.
pub struct SqliteRiskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRiskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Ids of projects a risk reaches, directly or through a linked task.
    ///
    /// Sorted ascending, without duplicates. Tasks without a project are
    /// skipped.
    pub fn list_project_ids_for_risk(&self, risk_id: EntityId) -> RepoResult<Vec<EntityId>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id FROM project_risks WHERE risk_id = ?1
             UNION
             SELECT t.project_id
             FROM task_risks tr
             JOIN tasks t ON t.task_id = tr.task_id
             WHERE tr.risk_id = ?1
               AND t.project_id IS NOT NULL
             ORDER BY 1 ASC;",
        )?;
        let ids = stmt
            .query_map([risk_id], |row| row.get::<_, EntityId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl EntityRepository for SqliteRiskRepository<'_> {
    type Input = RiskInput;
    type Record = Risk;

    fn create(&self, input: &RiskInput) -> RepoResult<EntityId> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO risks (
                name,
                description,
                pre_impact,
                post_impact,
                pre_likelihood,
                post_likelihood,
                pre_score,
                post_score,
                preparedness,
                date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                input.name.as_str(),
                input.description.as_deref(),
                input.pre_impact,
                input.post_impact,
                input.pre_likelihood,
                input.post_likelihood,
                input.pre_score,
                input.post_score,
                input.preparedness,
                input.date.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Risk>> {
        let risk = self
            .conn
            .query_row(
                &format!("{RISK_SELECT_SQL} WHERE risk_id = ?1;"),
                [id],
                parse_risk_row,
            )
            .optional()?;
        Ok(risk)
    }

    fn list(&self) -> RepoResult<Vec<Risk>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RISK_SELECT_SQL} ORDER BY risk_id ASC;"))?;
        let risks = stmt
            .query_map([], parse_risk_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(risks)
    }

    fn update(&self, id: EntityId, input: &RiskInput) -> RepoResult<()> {
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE risks
             SET
                name = ?1,
                description = ?2,
                pre_impact = ?3,
                post_impact = ?4,
                pre_likelihood = ?5,
                post_likelihood = ?6,
                pre_score = ?7,
                post_score = ?8,
                preparedness = ?9,
                date = ?10
             WHERE risk_id = ?11;",
            params![
                input.name.as_str(),
                input.description.as_deref(),
                input.pre_impact,
                input.post_impact,
                input.pre_likelihood,
                input.post_likelihood,
                input.pre_score,
                input.post_score,
                input.preparedness,
                input.date.as_str(),
                id,
            ],
        )?;
        ensure_changed(changed, ENTITY, id)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM risks WHERE risk_id = ?1;", [id])?;
        ensure_changed(changed, ENTITY, id)
    }
}

fn parse_risk_row(row: &Row<'_>) -> rusqlite::Result<Risk> {
    Ok(Risk {
        risk_id: row.get("risk_id")?,
        fields: RiskInput {
            name: row.get("name")?,
            description: row.get("description")?,
            pre_impact: row.get("pre_impact")?,
            post_impact: row.get("post_impact")?,
            pre_likelihood: row.get("pre_likelihood")?,
            post_likelihood: row.get("post_likelihood")?,
            pre_score: row.get("pre_score")?,
            post_score: row.get("post_score")?,
            preparedness: row.get("preparedness")?,
            date: row.get("date")?,
        },
    })
}
