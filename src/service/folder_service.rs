//! Folder tree use-case service.
//!
//! # Responsibility
//! - Validate tree hierarchy invariants above the repository layer.
//! - Provide folder create, list, pin-toggle and delete operations.
//!
//! # Invariants
//! - A parent, when provided, must exist and be owned by the same user.
//! - The parent chain is verified acyclic before every create. Reparenting
//!   is not exposed, so a cycle cannot be introduced here; the walk guards
//!   against corrupt persisted chains instead of trusting them.
//! - Deletion of a non-empty folder is refused, never cascaded.

use crate::model::folder::{normalize_folder_name, Folder, FolderId};
use crate::model::user::UserId;
use crate::repo::folder_repo::FolderRepository;
use crate::repo::{EntityKind, StoreError, StoreResult};
use std::collections::HashSet;

/// Use-case facade for the per-user folder tree.
pub struct FolderService<R: FolderRepository> {
    repo: R,
}

impl<R: FolderRepository> FolderService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one folder under an optional parent.
    pub fn create_folder(
        &self,
        user_uuid: UserId,
        name: &str,
        parent_uuid: Option<FolderId>,
    ) -> StoreResult<Folder> {
        let name = normalize_folder_name(name)?;
        if let Some(parent_uuid) = parent_uuid {
            self.ensure_parent_chain(user_uuid, parent_uuid)?;
        }
        self.repo.create_folder(user_uuid, &name, parent_uuid)
    }

    /// Lists child folders under one parent (root when `None`), pinned
    /// first, then newest first.
    pub fn list_children(
        &self,
        user_uuid: UserId,
        parent_uuid: Option<FolderId>,
    ) -> StoreResult<Vec<Folder>> {
        if let Some(parent_uuid) = parent_uuid {
            self.require_folder(user_uuid, parent_uuid)?;
        }
        self.repo.list_children(user_uuid, parent_uuid)
    }

    /// Flips the pin flag on one folder.
    pub fn toggle_pin(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<Folder> {
        self.repo.toggle_pin(user_uuid, folder_uuid)
    }

    /// Deletes one folder; refused while files or child folders reference
    /// it.
    pub fn delete_folder(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<()> {
        self.repo.delete_folder(user_uuid, folder_uuid)
    }

    fn require_folder(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<Folder> {
        self.repo
            .get_folder(user_uuid, folder_uuid)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Folder, folder_uuid))
    }

    /// Walks the parent chain to the root, rejecting corrupt cyclic chains.
    ///
    /// The walk terminates within the tree's actual depth for healthy data.
    fn ensure_parent_chain(&self, user_uuid: UserId, parent_uuid: FolderId) -> StoreResult<()> {
        let mut visited = HashSet::new();
        let mut cursor = Some(parent_uuid);
        while let Some(current) = cursor {
            if !visited.insert(current) {
                return Err(StoreError::InvalidData(format!(
                    "folder parent chain contains a cycle at {current}"
                )));
            }
            let folder = self.require_folder(user_uuid, current)?;
            cursor = folder.parent_uuid;
        }
        Ok(())
    }
}
