//! Folder domain model.
//!
//! # Responsibility
//! - Define the read model for one node of the per-user folder tree.
//! - Own folder name normalization.
//!
//! # Invariants
//! - `parent_uuid` references a folder owned by the same user, or is `None`
//!   for a root-level folder.
//! - The parent chain is acyclic and terminates at a root folder.
//! - Names are stored trimmed, non-empty and at most 100 characters.

use crate::model::ordering::PinSortable;
use crate::model::user::UserId;
use crate::model::{ValidationError, FOLDER_NAME_MAX_CHARS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a folder.
pub type FolderId = Uuid;

/// Named container node in a per-user tree used to group files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Stable folder id.
    pub uuid: FolderId,
    /// Owning user.
    pub user_uuid: UserId,
    /// Display name, trimmed.
    pub name: String,
    /// Parent folder. `None` means root level.
    pub parent_uuid: Option<FolderId>,
    /// Pin flag; pinned folders list before unpinned siblings.
    pub is_pinned: bool,
    /// Epoch ms creation timestamp; the folder recency key.
    pub created_at: i64,
}

impl PinSortable for Folder {
    fn pinned(&self) -> bool {
        self.is_pinned
    }

    fn recency_epoch_ms(&self) -> i64 {
        self.created_at
    }

    fn order_id(&self) -> Uuid {
        self.uuid
    }
}

/// Trims and validates a folder name.
pub fn normalize_folder_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::FolderNameBlank);
    }
    let length = trimmed.chars().count();
    if length > FOLDER_NAME_MAX_CHARS {
        return Err(ValidationError::FolderNameTooLong { length });
    }
    Ok(trimmed.to_string())
}
