//! User registry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Maintain the registry the rollover batch iterates and tests seed.
//! - Round-trip the versioned settings column.
//!
//! # Invariants
//! - Emails are unique across the registry.
//! - `password_hash` is stored and returned opaquely; this crate never
//!   interprets it.
//! - `list_user_ids` order is stable (`created_at ASC, uuid ASC`) so batch
//!   runs visit users deterministically.

use crate::model::user::{UserAccount, UserId, UserSettings};
use crate::repo::{parse_uuid, EntityKind, StoreError, StoreResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT
    uuid,
    display_name,
    email,
    password_hash,
    settings,
    created_at,
    updated_at
FROM users";

/// Repository interface for the user registry.
pub trait UserRepository {
    /// Registers one user.
    fn create_user(
        &self,
        display_name: &str,
        email: &str,
        password_hash: &str,
        settings: &UserSettings,
    ) -> StoreResult<UserAccount>;
    /// Loads one user by id.
    fn get_user(&self, user_uuid: UserId) -> StoreResult<Option<UserAccount>>;
    /// Lists all known user ids in stable order.
    fn list_user_ids(&self) -> StoreResult<Vec<UserId>>;
    /// Replaces the settings column for one user.
    fn update_settings(&self, user_uuid: UserId, settings: &UserSettings) -> StoreResult<()>;
}

/// SQLite-backed user registry.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(
        &self,
        display_name: &str,
        email: &str,
        password_hash: &str,
        settings: &UserSettings,
    ) -> StoreResult<UserAccount> {
        let user_uuid = Uuid::new_v4();
        let settings_json = settings
            .to_json()
            .map_err(|err| StoreError::InvalidData(format!("unserializable settings: {err}")))?;
        self.conn.execute(
            "INSERT INTO users (uuid, display_name, email, password_hash, settings)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user_uuid.to_string(),
                display_name,
                email,
                password_hash,
                settings_json,
            ],
        )?;
        load_required_user(self.conn, user_uuid)
    }

    fn get_user(&self, user_uuid: UserId) -> StoreResult<Option<UserAccount>> {
        let mut stmt = self.conn.prepare(&format!(
            "{USER_SELECT_SQL}
             WHERE uuid = ?1;"
        ))?;

        let mut rows = stmt.query([user_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn list_user_ids(&self) -> StoreResult<Vec<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid
             FROM users
             ORDER BY created_at ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "users.uuid")?);
        }
        Ok(ids)
    }

    fn update_settings(&self, user_uuid: UserId, settings: &UserSettings) -> StoreResult<()> {
        let settings_json = settings
            .to_json()
            .map_err(|err| StoreError::InvalidData(format!("unserializable settings: {err}")))?;
        let changed = self.conn.execute(
            "UPDATE users
             SET settings = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![user_uuid.to_string(), settings_json],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(EntityKind::User, user_uuid));
        }
        Ok(())
    }
}

fn load_required_user(conn: &Connection, user_uuid: UserId) -> StoreResult<UserAccount> {
    let mut stmt = conn.prepare(&format!(
        "{USER_SELECT_SQL}
         WHERE uuid = ?1;"
    ))?;
    let mut rows = stmt.query([user_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_user_row(row);
    }
    Err(StoreError::not_found(EntityKind::User, user_uuid))
}

fn parse_user_row(row: &Row<'_>) -> StoreResult<UserAccount> {
    let uuid_text: String = row.get("uuid")?;
    let settings_text: String = row.get("settings")?;

    Ok(UserAccount {
        uuid: parse_uuid(&uuid_text, "users.uuid")?,
        display_name: row.get("display_name")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        settings: UserSettings::from_json(&settings_text),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
