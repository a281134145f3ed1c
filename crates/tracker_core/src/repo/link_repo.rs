//! Junction-table repository.
//!
//! # Responsibility
//! - CRUD over the four pair-only junctions through `LinkKind`.
//! - CRUD over task and milestone dependencies through `DependencyScope`.
//!
//! # Invariants
//! - Table and column names come from the closed `LinkKind`/`DependencyScope`
//!   enums, never from caller strings.
//! - Re-keying a row is one `UPDATE`; a clash with an existing row surfaces
//!   as a constraint violation.

use super::{ensure_changed, RepoError, RepoResult};
use crate::model::link::{Dependency, DependencyScope, Link, LinkKind};
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for junction rows.
pub trait LinkRepository {
    fn create_link(&self, link: &Link) -> RepoResult<()>;
    fn get_link(&self, kind: LinkKind, left: EntityId, right: EntityId)
        -> RepoResult<Option<Link>>;
    fn list_links(&self, kind: LinkKind) -> RepoResult<Vec<Link>>;
    /// Moves the row keyed by `current` to the keys of `replacement`.
    fn rekey_link(&self, current: &Link, replacement: &Link) -> RepoResult<()>;
    fn delete_link(&self, link: &Link) -> RepoResult<()>;

    fn create_dependency(&self, scope: DependencyScope, dependency: &Dependency)
        -> RepoResult<()>;
    fn get_dependency(
        &self,
        scope: DependencyScope,
        source_id: EntityId,
        target_id: EntityId,
    ) -> RepoResult<Option<Dependency>>;
    fn list_dependencies(&self, scope: DependencyScope) -> RepoResult<Vec<Dependency>>;
    /// Replaces the row keyed by `(source_id, target_id)`, keys included.
    fn update_dependency(
        &self,
        scope: DependencyScope,
        source_id: EntityId,
        target_id: EntityId,
        dependency: &Dependency,
    ) -> RepoResult<()>;
    fn delete_dependency(
        &self,
        scope: DependencyScope,
        source_id: EntityId,
        target_id: EntityId,
    ) -> RepoResult<()>;
}

/// SQLite-backed junction repository.
pub struct SqliteLinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLinkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LinkRepository for SqliteLinkRepository<'_> {
    fn create_link(&self, link: &Link) -> RepoResult<()> {
        let (left, right) = link.kind.columns();
        self.conn.execute(
            &format!(
                "INSERT INTO {table} ({left}, {right}) VALUES (?1, ?2);",
                table = link.kind.table()
            ),
            params![link.left, link.right],
        )?;
        Ok(())
    }

    fn get_link(
        &self,
        kind: LinkKind,
        left: EntityId,
        right: EntityId,
    ) -> RepoResult<Option<Link>> {
        let (left_column, right_column) = kind.columns();
        let link = self
            .conn
            .query_row(
                &format!(
                    "SELECT {left_column}, {right_column}
                     FROM {table}
                     WHERE {left_column} = ?1 AND {right_column} = ?2;",
                    table = kind.table()
                ),
                params![left, right],
                |row| Ok(Link::new(kind, row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(link)
    }

    fn list_links(&self, kind: LinkKind) -> RepoResult<Vec<Link>> {
        let (left_column, right_column) = kind.columns();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {left_column}, {right_column}
             FROM {table}
             ORDER BY {left_column} ASC, {right_column} ASC;",
            table = kind.table()
        ))?;
        let links = stmt
            .query_map([], |row| Ok(Link::new(kind, row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn rekey_link(&self, current: &Link, replacement: &Link) -> RepoResult<()> {
        if current.kind != replacement.kind {
            return Err(RepoError::InvalidData(format!(
                "cannot move a {} row into {}",
                current.kind.table(),
                replacement.kind.table()
            )));
        }

        let (left_column, right_column) = current.kind.columns();
        let changed = self.conn.execute(
            &format!(
                "UPDATE {table}
                 SET {left_column} = ?1, {right_column} = ?2
                 WHERE {left_column} = ?3 AND {right_column} = ?4;",
                table = current.kind.table()
            ),
            params![
                replacement.left,
                replacement.right,
                current.left,
                current.right
            ],
        )?;
        ensure_changed(changed, current.kind.label(), link_key(current))
    }

    fn delete_link(&self, link: &Link) -> RepoResult<()> {
        let (left_column, right_column) = link.kind.columns();
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM {table} WHERE {left_column} = ?1 AND {right_column} = ?2;",
                table = link.kind.table()
            ),
            params![link.left, link.right],
        )?;
        ensure_changed(changed, link.kind.label(), link_key(link))
    }

    fn create_dependency(
        &self,
        scope: DependencyScope,
        dependency: &Dependency,
    ) -> RepoResult<()> {
        dependency.validate()?;

        self.conn.execute(
            &format!(
                "INSERT INTO {table} (source_id, target_id, dependency_type, lag)
                 VALUES (?1, ?2, ?3, ?4);",
                table = scope.table()
            ),
            params![
                dependency.source_id,
                dependency.target_id,
                dependency.dependency_type.as_str(),
                dependency.lag,
            ],
        )?;
        Ok(())
    }

    fn get_dependency(
        &self,
        scope: DependencyScope,
        source_id: EntityId,
        target_id: EntityId,
    ) -> RepoResult<Option<Dependency>> {
        let dependency = self
            .conn
            .query_row(
                &format!(
                    "SELECT source_id, target_id, dependency_type, lag
                     FROM {table}
                     WHERE source_id = ?1 AND target_id = ?2;",
                    table = scope.table()
                ),
                params![source_id, target_id],
                parse_dependency_row,
            )
            .optional()?;
        Ok(dependency)
    }

    fn list_dependencies(&self, scope: DependencyScope) -> RepoResult<Vec<Dependency>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT source_id, target_id, dependency_type, lag
             FROM {table}
             ORDER BY source_id ASC, target_id ASC;",
            table = scope.table()
        ))?;
        let dependencies = stmt
            .query_map([], parse_dependency_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dependencies)
    }

    fn update_dependency(
        &self,
        scope: DependencyScope,
        source_id: EntityId,
        target_id: EntityId,
        dependency: &Dependency,
    ) -> RepoResult<()> {
        dependency.validate()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE {table}
                 SET
                    source_id = ?1,
                    target_id = ?2,
                    dependency_type = ?3,
                    lag = ?4
                 WHERE source_id = ?5 AND target_id = ?6;",
                table = scope.table()
            ),
            params![
                dependency.source_id,
                dependency.target_id,
                dependency.dependency_type.as_str(),
                dependency.lag,
                source_id,
                target_id,
            ],
        )?;
        ensure_changed(changed, scope.label(), format!("{source_id}/{target_id}"))
    }

    fn delete_dependency(
        &self,
        scope: DependencyScope,
        source_id: EntityId,
        target_id: EntityId,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "DELETE FROM {table} WHERE source_id = ?1 AND target_id = ?2;",
                table = scope.table()
            ),
            params![source_id, target_id],
        )?;
        ensure_changed(changed, scope.label(), format!("{source_id}/{target_id}"))
    }
}

fn link_key(link: &Link) -> String {
    format!("{}/{}", link.left, link.right)
}

fn parse_dependency_row(row: &Row<'_>) -> rusqlite::Result<Dependency> {
    Ok(Dependency {
        source_id: row.get("source_id")?,
        target_id: row.get("target_id")?,
        dependency_type: row.get("dependency_type")?,
        lag: row.get("lag")?,
    })
}
