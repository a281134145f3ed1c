//! Task repository.

use super::{ensure_changed, EntityRepository, RepoResult};
use crate::model::task::{Task, TaskInput};
use crate::model::EntityId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    task_id,
    name,
    start_date,
    end_date,
    duration,
    progress,
    project_id,
    description
FROM tasks";

const ENTITY: &str = "Task";

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists tasks owned by one project, ordered by id.
    pub fn list_by_project(&self, project_id: EntityId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE project_id = ?1 ORDER BY task_id ASC;"
        ))?;
        let tasks = stmt
            .query_map([project_id], parse_task_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

impl EntityRepository for SqliteTaskRepository<'_> {
    type Input = TaskInput;
    type Record = Task;

    fn create(&self, input: &TaskInput) -> RepoResult<EntityId> {
        input.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                name,
                start_date,
                end_date,
                duration,
                progress,
                project_id,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                input.name.as_str(),
                input.start_date.as_str(),
                input.end_date.as_str(),
                input.duration,
                input.progress,
                input.project_id,
                input.description.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE task_id = ?1;"),
                [id],
                parse_task_row,
            )
            .optional()?;
        Ok(task)
    }

    fn list(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY task_id ASC;"))?;
        let tasks = stmt
            .query_map([], parse_task_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn update(&self, id: EntityId, input: &TaskInput) -> RepoResult<()> {
        input.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                name = ?1,
                start_date = ?2,
                end_date = ?3,
                duration = ?4,
                progress = ?5,
                project_id = ?6,
                description = ?7
             WHERE task_id = ?8;",
            params![
                input.name.as_str(),
                input.start_date.as_str(),
                input.end_date.as_str(),
                input.duration,
                input.progress,
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
            .execute("DELETE FROM tasks WHERE task_id = ?1;", [id])?;
        ensure_changed(changed, ENTITY, id)
    }
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        task_id: row.get("task_id")?,
        fields: TaskInput {
            name: row.get("name")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            duration: row.get("duration")?,
            progress: row.get("progress")?,
            project_id: row.get("project_id")?,
            description: row.get("description")?,
        },
    })
}
