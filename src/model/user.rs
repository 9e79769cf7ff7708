//! User registry read model and typed settings.
//!
//! # Responsibility
//! - Define the user record the core references by id.
//! - Replace the original untyped settings blob with a versioned structure.
//!
//! # Invariants
//! - `password_hash` is opaque to this crate; hashing and verification are
//!   owned by the external auth collaborator.
//! - Settings always decode: unknown or corrupt blobs fall back to the
//!   documented default instead of failing the user read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user.
pub type UserId = Uuid;

/// Current settings schema version.
pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

/// Versioned per-user preferences stored as JSON on the user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings schema version for forward migration.
    pub schema_version: u32,
    /// Theme preference.
    pub theme: Theme,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            theme: Theme::Light,
        }
    }
}

impl UserSettings {
    /// Serializes settings for the storage column.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes settings from the storage column.
    ///
    /// Corrupt or unrecognized blobs decode to the default.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// Registered user referenced by every owned entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Stable user id.
    pub uuid: UserId,
    /// Display name; may be empty.
    pub display_name: String,
    /// Unique login email.
    pub email: String,
    /// Opaque hash owned by the auth collaborator.
    pub password_hash: String,
    /// Typed preferences.
    pub settings: UserSettings,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{Theme, UserSettings, SETTINGS_SCHEMA_VERSION};

    #[test]
    fn default_is_light_theme_on_current_schema() {
        let settings = UserSettings::default();
        assert_eq!(settings.schema_version, SETTINGS_SCHEMA_VERSION);
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = UserSettings {
            schema_version: SETTINGS_SCHEMA_VERSION,
            theme: Theme::Dark,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(UserSettings::from_json(&json), settings);
    }

    #[test]
    fn corrupt_blob_falls_back_to_default() {
        assert_eq!(UserSettings::from_json("not json"), UserSettings::default());
        assert_eq!(
            UserSettings::from_json(r#"{"daylytics-theme":"light"}"#),
            UserSettings::default()
        );
    }
}
