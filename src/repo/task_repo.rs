//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `(user, day)`-bucketed `tasks` collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the title before SQL mutations.
//! - Day listing is deterministic: `created_at ASC, uuid ASC`.
//! - The done flag flips in a single UPDATE statement; there is no
//!   read-modify-write window for concurrent toggles to lose.

use crate::model::day::DayKey;
use crate::model::task::{validate_task_title, Task, TaskId};
use crate::model::user::UserId;
use crate::repo::{parse_bool, parse_day, parse_uuid, EntityKind, StoreError, StoreResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    title,
    day,
    done,
    created_at
FROM tasks";

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    /// Creates one task in the given day bucket.
    fn create_task(&self, user_uuid: UserId, title: &str, day: DayKey) -> StoreResult<Task>;
    /// Loads one task owned by the user.
    fn get_task(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<Option<Task>>;
    /// Lists the day bucket in creation order.
    fn list_by_day(&self, user_uuid: UserId, day: DayKey) -> StoreResult<Vec<Task>>;
    /// Atomically flips the done flag and returns the updated task.
    fn toggle_done(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<Task>;
    /// Replaces the title, with the same validation as create.
    fn rename_task(&self, user_uuid: UserId, task_uuid: TaskId, title: &str) -> StoreResult<Task>;
    /// Deletes one task.
    fn delete_task(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<()>;
    /// Deletes the whole day bucket, returning the removed row count.
    fn delete_all_for_day(&self, user_uuid: UserId, day: DayKey) -> StoreResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, user_uuid: UserId, title: &str, day: DayKey) -> StoreResult<Task> {
        validate_task_title(title)?;

        let task_uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (uuid, user_uuid, title, day) VALUES (?1, ?2, ?3, ?4);",
            params![
                task_uuid.to_string(),
                user_uuid.to_string(),
                title,
                day.to_string(),
            ],
        )?;

        load_required_task(self.conn, user_uuid, task_uuid)
    }

    fn get_task(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE uuid = ?1
               AND user_uuid = ?2;"
        ))?;

        let mut rows = stmt.query(params![task_uuid.to_string(), user_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_by_day(&self, user_uuid: UserId, day: DayKey) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE user_uuid = ?1
               AND day = ?2
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query(params![user_uuid.to_string(), day.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn toggle_done(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<Task> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET done = CASE done WHEN 0 THEN 1 ELSE 0 END
             WHERE uuid = ?1
               AND user_uuid = ?2;",
            params![task_uuid.to_string(), user_uuid.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::Task, task_uuid));
        }
        load_required_task(self.conn, user_uuid, task_uuid)
    }

    fn rename_task(&self, user_uuid: UserId, task_uuid: TaskId, title: &str) -> StoreResult<Task> {
        validate_task_title(title)?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET title = ?3
             WHERE uuid = ?1
               AND user_uuid = ?2;",
            params![task_uuid.to_string(), user_uuid.to_string(), title],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::Task, task_uuid));
        }
        load_required_task(self.conn, user_uuid, task_uuid)
    }

    fn delete_task(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks
             WHERE uuid = ?1
               AND user_uuid = ?2;",
            params![task_uuid.to_string(), user_uuid.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::Task, task_uuid));
        }
        Ok(())
    }

    fn delete_all_for_day(&self, user_uuid: UserId, day: DayKey) -> StoreResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM tasks
             WHERE user_uuid = ?1
               AND day = ?2;",
            params![user_uuid.to_string(), day.to_string()],
        )?;
        Ok(removed)
    }
}

fn load_required_task(
    conn: &Connection,
    user_uuid: UserId,
    task_uuid: TaskId,
) -> StoreResult<Task> {
    let mut stmt = conn.prepare(&format!(
        "{TASK_SELECT_SQL}
         WHERE uuid = ?1
           AND user_uuid = ?2;"
    ))?;
    let mut rows = stmt.query(params![task_uuid.to_string(), user_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_task_row(row);
    }
    Err(StoreError::not_found(EntityKind::Task, task_uuid))
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let day_text: String = row.get("day")?;

    Ok(Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        user_uuid: parse_uuid(&user_text, "tasks.user_uuid")?,
        title: row.get("title")?,
        day: parse_day(&day_text, "tasks.day")?,
        done: parse_bool(row.get("done")?, "tasks.done")?,
        created_at: row.get("created_at")?,
    })
}
