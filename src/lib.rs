//! Core domain logic for Daylytics.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::archive::{completion_percentage, ArchiveId, DailyArchive};
pub use model::day::DayKey;
pub use model::file::{FileId, NoteFile};
pub use model::folder::{Folder, FolderId};
pub use model::ordering::{pin_recency_cmp, PinSortable};
pub use model::task::{Task, TaskId};
pub use model::user::{Theme, UserAccount, UserId, UserSettings};
pub use model::ValidationError;
pub use repo::archive_repo::{ArchiveRepository, RolloverOutcome, SqliteArchiveRepository};
pub use repo::file_repo::{FilePatch, FileRepository, SqliteFileRepository};
pub use repo::folder_repo::{FolderRepository, SqliteFolderRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{EntityKind, StoreError, StoreResult};
pub use service::file_service::FileService;
pub use service::folder_service::FolderService;
pub use service::rollover::{RolloverEngine, RolloverRun, UserRollover};
pub use service::task_service::TaskService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
