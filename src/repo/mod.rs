//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity collection.
//! - Isolate SQLite query details and ordering behavior from services.
//!
//! # Invariants
//! - Every query is scoped by `user_uuid`; an entity that exists but belongs
//!   to another user is reported as not found.
//! - Write paths validate model fields before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod archive_repo;
pub mod file_repo;
pub mod folder_repo;
pub mod task_repo;
pub mod user_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity collection names used in not-found reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Archive,
    Folder,
    File,
    User,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Task => "task",
            Self::Archive => "archive",
            Self::Folder => "folder",
            Self::File => "file",
            Self::User => "user",
        };
        write!(f, "{name}")
    }
}

/// Unified store error taxonomy.
///
/// Maps directly onto the boundary layer's response classes: `Validation`
/// is a bad request, `NotFound` covers absent and foreign-owned entities,
/// `FolderNotEmpty` is the only conflict, and `Db`/`InvalidData` are
/// internal storage failures that are logged but not detailed to callers.
#[derive(Debug)]
pub enum StoreError {
    /// Malformed or out-of-range input, rejected before any write.
    Validation(ValidationError),
    /// Entity absent or not owned by the calling user.
    NotFound { entity: EntityKind, id: Uuid },
    /// Folder deletion blocked by contained files or child folders.
    FolderNotEmpty(Uuid),
    /// Persistence-layer failure.
    Db(DbError),
    /// Persisted state cannot be converted into a valid read model.
    InvalidData(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::FolderNotEmpty(id) => write!(f, "folder not empty: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::FolderNotEmpty(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &'static str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn parse_day(value: &str, column: &'static str) -> StoreResult<crate::model::day::DayKey> {
    crate::model::day::DayKey::parse(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid day `{value}` in {column}")))
}
