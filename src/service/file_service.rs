//! File use-case service.
//!
//! # Responsibility
//! - Provide file create/update/get/list APIs for boundary callers.
//! - Validate folder targets and normalize tag sets above the repository.
//!
//! # Invariants
//! - A folder target, when provided, must exist and be owned by the same
//!   user; unknown folder ids are rejected, never silently treated as root.
//! - Tags are normalized (lowercase, deduplicated) before persistence.

use crate::model::file::{normalize_tags, FileId, NoteFile};
use crate::model::folder::FolderId;
use crate::model::user::UserId;
use crate::repo::file_repo::{FilePatch, FileRepository};
use crate::repo::{EntityKind, StoreError, StoreResult};

/// Use-case facade for the per-user file store.
pub struct FileService<R: FileRepository> {
    repo: R,
}

impl<R: FileRepository> FileService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one file, optionally inside a folder.
    pub fn create_file(
        &self,
        user_uuid: UserId,
        title: &str,
        content: &str,
        folder_uuid: Option<FolderId>,
        tags: &[String],
    ) -> StoreResult<NoteFile> {
        if let Some(folder_uuid) = folder_uuid {
            self.require_folder(user_uuid, folder_uuid)?;
        }
        let tags = normalize_tags(tags)?;
        self.repo
            .create_file(user_uuid, title, content, folder_uuid, &tags)
    }

    /// Applies a partial update; unset fields are left unchanged and
    /// `updated_at` is bumped.
    pub fn update_file(
        &self,
        user_uuid: UserId,
        file_uuid: FileId,
        mut patch: FilePatch,
    ) -> StoreResult<NoteFile> {
        if let Some(Some(folder_uuid)) = patch.folder {
            self.require_folder(user_uuid, folder_uuid)?;
        }
        if let Some(tags) = patch.tags.as_deref() {
            patch.tags = Some(normalize_tags(tags)?);
        }
        self.repo.update_file(user_uuid, file_uuid, &patch)
    }

    /// Loads one file.
    pub fn get_file(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<Option<NoteFile>> {
        self.repo.get_file(user_uuid, file_uuid)
    }

    /// Lists files in one folder (root when `None`), pinned first, then
    /// most recently updated first.
    pub fn list_files(
        &self,
        user_uuid: UserId,
        folder_uuid: Option<FolderId>,
    ) -> StoreResult<Vec<NoteFile>> {
        if let Some(folder_uuid) = folder_uuid {
            self.require_folder(user_uuid, folder_uuid)?;
        }
        self.repo.list_files(user_uuid, folder_uuid)
    }

    /// Deletes one file.
    pub fn delete_file(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<()> {
        self.repo.delete_file(user_uuid, file_uuid)
    }

    /// Flips the pin flag on one file.
    pub fn toggle_pin(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<NoteFile> {
        self.repo.toggle_pin(user_uuid, file_uuid)
    }

    fn require_folder(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<()> {
        if self.repo.folder_exists(user_uuid, folder_uuid)? {
            Ok(())
        } else {
            Err(StoreError::not_found(EntityKind::Folder, folder_uuid))
        }
    }
}
