//! Team and resource repositories.
//!
//! # Invariants
//! - A resource always references an existing team.
//! - A team that still has resources cannot be deleted (foreign key).

use super::{ensure_changed, EntityRepository, RepoResult};
use crate::model::team::{Resource, ResourceInput, Team, TeamInput};
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TEAM_SELECT_SQL: &str = "SELECT team_id, name, description FROM teams";

const RESOURCE_SELECT_SQL: &str = "SELECT
    resource_id,
    name,
    capacity,
    role,
    team_id,
    description
FROM resources";

/// SQLite-backed team repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository for SqliteTeamRepository<'_> {
    type Input = TeamInput;
    type Record = Team;

    fn create(&self, input: &TeamInput) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO teams (name, description) VALUES (?1, ?2);",
            params![input.name.as_str(), input.description.as_deref()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Team>> {
        let team = self
            .conn
            .query_row(
                &format!("{TEAM_SELECT_SQL} WHERE team_id = ?1;"),
                [id],
                parse_team_row,
            )
            .optional()?;
        Ok(team)
    }

    fn list(&self) -> RepoResult<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_SELECT_SQL} ORDER BY team_id ASC;"))?;
        let teams = stmt
            .query_map([], parse_team_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(teams)
    }

    fn update(&self, id: EntityId, input: &TeamInput) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE teams SET name = ?1, description = ?2 WHERE team_id = ?3;",
            params![input.name.as_str(), input.description.as_deref(), id],
        )?;
        ensure_changed(changed, "Team", id)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM teams WHERE team_id = ?1;", [id])?;
        ensure_changed(changed, "Team", id)
    }
}

/// SQLite-backed resource repository.
pub struct SqliteResourceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResourceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityRepository for SqliteResourceRepository<'_> {
    type Input = ResourceInput;
    type Record = Resource;

    fn create(&self, input: &ResourceInput) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO resources (name, capacity, role, team_id, description)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                input.name.as_str(),
                input.capacity,
                input.role.as_str(),
                input.team_id,
                input.description.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Resource>> {
        let resource = self
            .conn
            .query_row(
                &format!("{RESOURCE_SELECT_SQL} WHERE resource_id = ?1;"),
                [id],
                parse_resource_row,
            )
            .optional()?;
        Ok(resource)
    }

    fn list(&self) -> RepoResult<Vec<Resource>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESOURCE_SELECT_SQL} ORDER BY resource_id ASC;"))?;
        let resources = stmt
            .query_map([], parse_resource_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(resources)
    }

    fn update(&self, id: EntityId, input: &ResourceInput) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE resources
             SET
                name = ?1,
                capacity = ?2,
                role = ?3,
                team_id = ?4,
                description = ?5
             WHERE resource_id = ?6;",
            params![
                input.name.as_str(),
                input.capacity,
                input.role.as_str(),
                input.team_id,
                input.description.as_deref(),
                id,
            ],
        )?;
        ensure_changed(changed, "Resource", id)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM resources WHERE resource_id = ?1;", [id])?;
        ensure_changed(changed, "Resource", id)
    }
}

fn parse_team_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        team_id: row.get("team_id")?,
        fields: TeamInput {
            name: row.get("name")?,
            description: row.get("description")?,
        },
    })
}

fn parse_resource_row(row: &Row<'_>) -> rusqlite::Result<Resource> {
    Ok(Resource {
        resource_id: row.get("resource_id")?,
        fields: ResourceInput {
            name: row.get("name")?,
            capacity: row.get("capacity")?,
            role: row.get("role")?,
            team_id: row.get("team_id")?,
            description: row.get("description")?,
        },
    })
}
