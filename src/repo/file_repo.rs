//! File repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs for markdown files and their tag sets.
//! - Own partial-update semantics and atomic tag replacement.
//!
//! # Invariants
//! - Listing is deterministic under the shared pin policy:
//!   `is_pinned DESC, updated_at DESC, uuid ASC`.
//! - Every successful update bumps `updated_at`, including tag-only changes.
//! - Tag replacement swaps the whole set inside the update transaction.
//! - The pin flag flips in a single UPDATE statement.

use crate::model::file::{validate_file_content, validate_file_title, FileId, NoteFile};
use crate::model::folder::FolderId;
use crate::model::ordering::pin_ordering_sql;
use crate::model::user::UserId;
use crate::repo::{parse_bool, parse_uuid, EntityKind, StoreError, StoreResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const FILE_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    title,
    content,
    folder_uuid,
    is_pinned,
    created_at,
    updated_at
FROM files";

/// Partial update for one file. Unset fields are left unchanged.
///
/// `folder` distinguishes "leave alone" (`None`) from "move to root"
/// (`Some(None)`) and "move into folder" (`Some(Some(id))`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder: Option<Option<FolderId>>,
    pub tags: Option<Vec<String>>,
}

/// Repository interface for file CRUD operations.
pub trait FileRepository {
    /// Creates one file, optionally inside a folder, with a normalized tag
    /// set.
    fn create_file(
        &self,
        user_uuid: UserId,
        title: &str,
        content: &str,
        folder_uuid: Option<FolderId>,
        tags: &[String],
    ) -> StoreResult<NoteFile>;
    /// Loads one file owned by the user.
    fn get_file(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<Option<NoteFile>>;
    /// Lists files in one folder (root when `None`), pin-ordered.
    fn list_files(
        &self,
        user_uuid: UserId,
        folder_uuid: Option<FolderId>,
    ) -> StoreResult<Vec<NoteFile>>;
    /// Applies a partial update and returns the updated file.
    fn update_file(
        &self,
        user_uuid: UserId,
        file_uuid: FileId,
        patch: &FilePatch,
    ) -> StoreResult<NoteFile>;
    /// Deletes one file and its tag links.
    fn delete_file(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<()>;
    /// Atomically flips the pin flag and returns the updated file.
    fn toggle_pin(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<NoteFile>;
    /// Reports whether a folder exists and is owned by the user.
    ///
    /// Used by the service layer to validate folder targets before create
    /// and move operations.
    fn folder_exists(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<bool>;
}

/// SQLite-backed file repository.
pub struct SqliteFileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FileRepository for SqliteFileRepository<'_> {
    fn create_file(
        &self,
        user_uuid: UserId,
        title: &str,
        content: &str,
        folder_uuid: Option<FolderId>,
        tags: &[String],
    ) -> StoreResult<NoteFile> {
        validate_file_title(title)?;
        validate_file_content(content)?;

        let file_uuid = Uuid::new_v4();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO files (uuid, user_uuid, title, content, folder_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                file_uuid.to_string(),
                user_uuid.to_string(),
                title,
                content,
                folder_uuid.map(|value| value.to_string()),
            ],
        )?;
        replace_tags(&tx, file_uuid, tags)?;
        let file = load_required_file(&tx, user_uuid, file_uuid)?;
        tx.commit()?;
        Ok(file)
    }

    fn get_file(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<Option<NoteFile>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FILE_SELECT_SQL}
             WHERE uuid = ?1
               AND user_uuid = ?2;"
        ))?;

        let mut rows = stmt.query(params![file_uuid.to_string(), user_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            let file = parse_file_row(self.conn, row)?;
            return Ok(Some(file));
        }
        Ok(None)
    }

    fn list_files(
        &self,
        user_uuid: UserId,
        folder_uuid: Option<FolderId>,
    ) -> StoreResult<Vec<NoteFile>> {
        let order = pin_ordering_sql("updated_at");
        let mut files = Vec::new();

        if let Some(folder_uuid) = folder_uuid {
            let mut stmt = self.conn.prepare(&format!(
                "{FILE_SELECT_SQL}
                 WHERE user_uuid = ?1
                   AND folder_uuid = ?2
                 ORDER BY {order};"
            ))?;
            let mut rows = stmt.query(params![user_uuid.to_string(), folder_uuid.to_string()])?;
            while let Some(row) = rows.next()? {
                files.push(parse_file_row(self.conn, row)?);
            }
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "{FILE_SELECT_SQL}
                 WHERE user_uuid = ?1
                   AND folder_uuid IS NULL
                 ORDER BY {order};"
            ))?;
            let mut rows = stmt.query([user_uuid.to_string()])?;
            while let Some(row) = rows.next()? {
                files.push(parse_file_row(self.conn, row)?);
            }
        }

        Ok(files)
    }

    fn update_file(
        &self,
        user_uuid: UserId,
        file_uuid: FileId,
        patch: &FilePatch,
    ) -> StoreResult<NoteFile> {
        let mut assignments = vec!["updated_at = (strftime('%s', 'now') * 1000)".to_string()];
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_deref() {
            validate_file_title(title)?;
            assignments.push("title = ?".to_string());
            bind_values.push(Value::Text(title.to_string()));
        }
        if let Some(content) = patch.content.as_deref() {
            validate_file_content(content)?;
            assignments.push("content = ?".to_string());
            bind_values.push(Value::Text(content.to_string()));
        }
        match patch.folder {
            None => {}
            Some(None) => assignments.push("folder_uuid = NULL".to_string()),
            Some(Some(folder_uuid)) => {
                assignments.push("folder_uuid = ?".to_string());
                bind_values.push(Value::Text(folder_uuid.to_string()));
            }
        }

        let sql = format!(
            "UPDATE files SET {} WHERE uuid = ? AND user_uuid = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Text(file_uuid.to_string()));
        bind_values.push(Value::Text(user_uuid.to_string()));

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::File, file_uuid));
        }
        if let Some(tags) = patch.tags.as_deref() {
            replace_tags(&tx, file_uuid, tags)?;
        }
        let file = load_required_file(&tx, user_uuid, file_uuid)?;
        tx.commit()?;
        Ok(file)
    }

    fn delete_file(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<()> {
        // ON DELETE CASCADE clears file_tags.
        let changed = self.conn.execute(
            "DELETE FROM files
             WHERE uuid = ?1
               AND user_uuid = ?2;",
            params![file_uuid.to_string(), user_uuid.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::File, file_uuid));
        }
        Ok(())
    }

    fn toggle_pin(&self, user_uuid: UserId, file_uuid: FileId) -> StoreResult<NoteFile> {
        let changed = self.conn.execute(
            "UPDATE files
             SET is_pinned = CASE is_pinned WHEN 0 THEN 1 ELSE 0 END
             WHERE uuid = ?1
               AND user_uuid = ?2;",
            params![file_uuid.to_string(), user_uuid.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::File, file_uuid));
        }
        load_required_file(self.conn, user_uuid, file_uuid)
    }

    fn folder_exists(&self, user_uuid: UserId, folder_uuid: FolderId) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM folders
                WHERE uuid = ?1
                  AND user_uuid = ?2
            );",
            params![folder_uuid.to_string(), user_uuid.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn replace_tags(conn: &Connection, file_uuid: FileId, tags: &[String]) -> StoreResult<()> {
    conn.execute(
        "DELETE FROM file_tags WHERE file_uuid = ?1;",
        [file_uuid.to_string()],
    )?;
    let mut insert = conn.prepare("INSERT INTO file_tags (file_uuid, tag) VALUES (?1, ?2);")?;
    for tag in tags {
        insert.execute(params![file_uuid.to_string(), tag])?;
    }
    Ok(())
}

fn load_tags(conn: &Connection, file_uuid: FileId) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM file_tags
         WHERE file_uuid = ?1
         ORDER BY tag ASC;",
    )?;
    let mut rows = stmt.query([file_uuid.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn load_required_file(
    conn: &Connection,
    user_uuid: UserId,
    file_uuid: FileId,
) -> StoreResult<NoteFile> {
    let mut stmt = conn.prepare(&format!(
        "{FILE_SELECT_SQL}
         WHERE uuid = ?1
           AND user_uuid = ?2;"
    ))?;
    let mut rows = stmt.query(params![file_uuid.to_string(), user_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_file_row(conn, row);
    }
    Err(StoreError::not_found(EntityKind::File, file_uuid))
}

fn parse_file_row(conn: &Connection, row: &Row<'_>) -> StoreResult<NoteFile> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let file_uuid = parse_uuid(&uuid_text, "files.uuid")?;
    let folder_uuid = row
        .get::<_, Option<String>>("folder_uuid")?
        .map(|value| parse_uuid(&value, "files.folder_uuid"))
        .transpose()?;
    let tags = load_tags(conn, file_uuid)?;

    Ok(NoteFile {
        uuid: file_uuid,
        user_uuid: parse_uuid(&user_text, "files.user_uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        folder_uuid,
        is_pinned: parse_bool(row.get("is_pinned")?, "files.is_pinned")?,
        tags,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
