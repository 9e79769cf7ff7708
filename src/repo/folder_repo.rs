//! Folder repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs for the per-user folder tree.
//! - Keep SQL details and listing order inside the repository boundary.
//!
//! # Invariants
//! - Child listing is deterministic under the shared pin policy:
//!   `is_pinned DESC, created_at DESC, uuid ASC`.
//! - Deletion and its emptiness check share one immediate transaction, so a
//!   folder can never vanish while still referenced.
//! - The pin flag flips in a single UPDATE statement.

use crate::model::folder::{Folder, FolderId};
use crate::model::ordering::pin_ordering_sql;
use crate::model::user::UserId;
use crate::repo::{parse_bool, parse_uuid, EntityKind, StoreError, StoreResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const FOLDER_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    name,
    parent_uuid,
    is_pinned,
    created_at
FROM folders";

/// Repository interface for folder tree operations.
pub trait FolderRepository {
    /// Creates one folder under an optional parent.
    fn create_folder(
        &self,
        user_uuid: UserId,
        name: &str,
        parent_uuid: Option<FolderId>,
    ) -> StoreResult<Folder>;
    /// Loads one folder owned by the user.
    fn get_folder(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<Option<Folder>>;
    /// Lists children under one parent (root when `None`), pin-ordered.
    fn list_children(
        &self,
        user_uuid: UserId,
        parent_uuid: Option<FolderId>,
    ) -> StoreResult<Vec<Folder>>;
    /// Atomically flips the pin flag and returns the updated folder.
    fn toggle_pin(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<Folder>;
    /// Deletes one folder; fails with a conflict while it contains anything.
    fn delete_folder(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<()>;
}

/// SQLite-backed folder repository.
pub struct SqliteFolderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFolderRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FolderRepository for SqliteFolderRepository<'_> {
    fn create_folder(
        &self,
        user_uuid: UserId,
        name: &str,
        parent_uuid: Option<FolderId>,
    ) -> StoreResult<Folder> {
        let folder_uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO folders (uuid, user_uuid, name, parent_uuid)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                folder_uuid.to_string(),
                user_uuid.to_string(),
                name,
                parent_uuid.map(|value| value.to_string()),
            ],
        )?;
        load_required_folder(self.conn, user_uuid, folder_uuid)
    }

    fn get_folder(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<Option<Folder>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FOLDER_SELECT_SQL}
             WHERE uuid = ?1
               AND user_uuid = ?2;"
        ))?;

        let mut rows = stmt.query(params![folder_uuid.to_string(), user_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_folder_row(row)?));
        }
        Ok(None)
    }

    fn list_children(
        &self,
        user_uuid: UserId,
        parent_uuid: Option<FolderId>,
    ) -> StoreResult<Vec<Folder>> {
        let order = pin_ordering_sql("created_at");
        let mut folders = Vec::new();

        if let Some(parent_uuid) = parent_uuid {
            let mut stmt = self.conn.prepare(&format!(
                "{FOLDER_SELECT_SQL}
                 WHERE user_uuid = ?1
                   AND parent_uuid = ?2
                 ORDER BY {order};"
            ))?;
            let mut rows = stmt.query(params![user_uuid.to_string(), parent_uuid.to_string()])?;
            while let Some(row) = rows.next()? {
                folders.push(parse_folder_row(row)?);
            }
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "{FOLDER_SELECT_SQL}
                 WHERE user_uuid = ?1
                   AND parent_uuid IS NULL
                 ORDER BY {order};"
            ))?;
            let mut rows = stmt.query([user_uuid.to_string()])?;
            while let Some(row) = rows.next()? {
                folders.push(parse_folder_row(row)?);
            }
        }

        Ok(folders)
    }

    fn toggle_pin(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<Folder> {
        let changed = self.conn.execute(
            "UPDATE folders
             SET is_pinned = CASE is_pinned WHEN 0 THEN 1 ELSE 0 END
             WHERE uuid = ?1
               AND user_uuid = ?2;",
            params![folder_uuid.to_string(), user_uuid.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::Folder, folder_uuid));
        }
        load_required_folder(self.conn, user_uuid, folder_uuid)
    }

    fn delete_folder(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let exists: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM folders
                WHERE uuid = ?1
                  AND user_uuid = ?2
            );",
            params![folder_uuid.to_string(), user_uuid.to_string()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(StoreError::not_found(EntityKind::Folder, folder_uuid));
        }

        let occupied: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM folders WHERE parent_uuid = ?1
            ) OR EXISTS(
                SELECT 1 FROM files WHERE folder_uuid = ?1
            );",
            [folder_uuid.to_string()],
            |row| row.get(0),
        )?;
        if occupied == 1 {
            return Err(StoreError::FolderNotEmpty(folder_uuid));
        }

        tx.execute(
            "DELETE FROM folders
             WHERE uuid = ?1
               AND user_uuid = ?2;",
            params![folder_uuid.to_string(), user_uuid.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn load_required_folder(
    conn: &Connection,
    user_uuid: UserId,
    folder_uuid: FolderId,
) -> StoreResult<Folder> {
    let mut stmt = conn.prepare(&format!(
        "{FOLDER_SELECT_SQL}
         WHERE uuid = ?1
           AND user_uuid = ?2;"
    ))?;
    let mut rows = stmt.query(params![folder_uuid.to_string(), user_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_folder_row(row);
    }
    Err(StoreError::not_found(EntityKind::Folder, folder_uuid))
}

fn parse_folder_row(row: &Row<'_>) -> StoreResult<Folder> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let parent_uuid = row
        .get::<_, Option<String>>("parent_uuid")?
        .map(|value| parse_uuid(&value, "folders.parent_uuid"))
        .transpose()?;

    Ok(Folder {
        uuid: parse_uuid(&uuid_text, "folders.uuid")?,
        user_uuid: parse_uuid(&user_text, "folders.user_uuid")?,
        name: row.get("name")?,
        parent_uuid,
        is_pinned: parse_bool(row.get("is_pinned")?, "folders.is_pinned")?,
        created_at: row.get("created_at")?,
    })
}
