//! Domain model for per-user tasks, archives, folders and files.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field validation rules applied before any persistence write.
//!
//! # Invariants
//! - Every domain object is identified by a stable `Uuid`.
//! - Every domain object belongs to exactly one user; cross-user references
//!   never appear in a valid record.
//! - Validation limits mirror the externally documented API contract.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod archive;
pub mod day;
pub mod file;
pub mod folder;
pub mod ordering;
pub mod task;
pub mod user;

/// Maximum task title length in characters.
pub const TASK_TITLE_MAX_CHARS: usize = 500;
/// Maximum whitespace-delimited words in a task title.
pub const TASK_TITLE_MAX_WORDS: usize = 50;
/// Maximum folder name length in characters (after trimming).
pub const FOLDER_NAME_MAX_CHARS: usize = 100;
/// Maximum file title length in characters.
pub const FILE_TITLE_MAX_CHARS: usize = 200;
/// Maximum file content length in characters.
pub const FILE_CONTENT_MAX_CHARS: usize = 50_000;
/// Maximum tag length in characters (after normalization).
pub const TAG_MAX_CHARS: usize = 30;

/// Field-level validation failure raised before any write is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task title is empty or whitespace-only.
    TaskTitleBlank,
    /// Task title exceeds `TASK_TITLE_MAX_CHARS`.
    TaskTitleTooLong { length: usize },
    /// Task title exceeds `TASK_TITLE_MAX_WORDS`.
    TaskTitleTooManyWords { words: usize },
    /// Folder name is empty after trimming.
    FolderNameBlank,
    /// Folder name exceeds `FOLDER_NAME_MAX_CHARS`.
    FolderNameTooLong { length: usize },
    /// File title is empty or whitespace-only.
    FileTitleBlank,
    /// File title exceeds `FILE_TITLE_MAX_CHARS`.
    FileTitleTooLong { length: usize },
    /// File content exceeds `FILE_CONTENT_MAX_CHARS`.
    FileContentTooLong { length: usize },
    /// Tag is empty after normalization.
    TagBlank,
    /// Tag exceeds `TAG_MAX_CHARS`.
    TagTooLong { tag: String },
    /// Tag contains embedded whitespace.
    TagContainsWhitespace { tag: String },
    /// Input is not a valid `YYYY-MM-DD` calendar day.
    InvalidDay { input: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskTitleBlank => write!(f, "task title must not be blank"),
            Self::TaskTitleTooLong { length } => write!(
                f,
                "task title cannot exceed {TASK_TITLE_MAX_CHARS} characters, got {length}"
            ),
            Self::TaskTitleTooManyWords { words } => write!(
                f,
                "task title cannot exceed {TASK_TITLE_MAX_WORDS} words, got {words}"
            ),
            Self::FolderNameBlank => write!(f, "folder name must not be blank"),
            Self::FolderNameTooLong { length } => write!(
                f,
                "folder name cannot exceed {FOLDER_NAME_MAX_CHARS} characters, got {length}"
            ),
            Self::FileTitleBlank => write!(f, "file title must not be blank"),
            Self::FileTitleTooLong { length } => write!(
                f,
                "file title cannot exceed {FILE_TITLE_MAX_CHARS} characters, got {length}"
            ),
            Self::FileContentTooLong { length } => write!(
                f,
                "file content cannot exceed {FILE_CONTENT_MAX_CHARS} characters, got {length}"
            ),
            Self::TagBlank => write!(f, "tag must not be blank"),
            Self::TagTooLong { tag } => {
                write!(f, "tag cannot exceed {TAG_MAX_CHARS} characters: `{tag}`")
            }
            Self::TagContainsWhitespace { tag } => {
                write!(f, "tag must not contain whitespace: `{tag}`")
            }
            Self::InvalidDay { input } => {
                write!(f, "invalid calendar day `{input}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for ValidationError {}
