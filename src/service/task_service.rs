//! Task use-case service.
//!
//! # Responsibility
//! - Provide stable task entry points for boundary callers.
//! - Resolve caller-supplied date strings, defaulting to today.
//!
//! # Invariants
//! - Date input is normalized through `DayKey::parse` before any storage
//!   access; malformed dates never reach SQL.
//! - Title validation happens before any write.

use crate::model::day::DayKey;
use crate::model::task::{Task, TaskId};
use crate::model::user::UserId;
use crate::repo::task_repo::TaskRepository;
use crate::repo::StoreResult;

/// Use-case facade for the date-bucketed task store.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task for the given date, defaulting to today.
    ///
    /// Callers may pass a full timestamp; only the date portion is kept.
    pub fn create_task(
        &self,
        user_uuid: UserId,
        title: &str,
        date: Option<&str>,
    ) -> StoreResult<Task> {
        let day = resolve_day(date)?;
        self.repo.create_task(user_uuid, title, day)
    }

    /// Lists the day's tasks in creation order, defaulting to today.
    pub fn list_by_date(&self, user_uuid: UserId, date: Option<&str>) -> StoreResult<Vec<Task>> {
        let day = resolve_day(date)?;
        self.repo.list_by_day(user_uuid, day)
    }

    /// Flips the done flag on one task.
    pub fn toggle_done(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<Task> {
        self.repo.toggle_done(user_uuid, task_uuid)
    }

    /// Renames one task with the same validation as create.
    pub fn rename_task(
        &self,
        user_uuid: UserId,
        task_uuid: TaskId,
        title: &str,
    ) -> StoreResult<Task> {
        self.repo.rename_task(user_uuid, task_uuid, title)
    }

    /// Deletes one task.
    pub fn delete_task(&self, user_uuid: UserId, task_uuid: TaskId) -> StoreResult<()> {
        self.repo.delete_task(user_uuid, task_uuid)
    }

    /// Deletes every task for the given date, defaulting to today.
    ///
    /// Returns the number of removed tasks.
    pub fn delete_all_for_date(
        &self,
        user_uuid: UserId,
        date: Option<&str>,
    ) -> StoreResult<usize> {
        let day = resolve_day(date)?;
        self.repo.delete_all_for_day(user_uuid, day)
    }
}

fn resolve_day(date: Option<&str>) -> StoreResult<DayKey> {
    match date {
        Some(raw) => Ok(DayKey::parse(raw)?),
        None => Ok(DayKey::today()),
    }
}
