//! File (note) domain model.
//!
//! # Responsibility
//! - Define the read model for one markdown note, optionally placed in a
//!   folder.
//! - Own title/content limits and tag normalization.
//!
//! # Invariants
//! - `folder_uuid` references a folder owned by the same user, or is `None`
//!   for a root-level file. The reference is a back-reference, not
//!   ownership: deleting a folder never deletes files.
//! - Tags are lowercase, at most 30 characters, contain no whitespace, and
//!   form a set (deduplicated, stored sorted).

use crate::model::folder::FolderId;
use crate::model::ordering::PinSortable;
use crate::model::user::UserId;
use crate::model::{ValidationError, FILE_CONTENT_MAX_CHARS, FILE_TITLE_MAX_CHARS, TAG_MAX_CHARS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

static TAG_WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s").expect("valid whitespace regex"));

/// Stable identifier for a file.
pub type FileId = Uuid;

/// User-owned markdown note, optionally grouped under one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFile {
    /// Stable file id.
    pub uuid: FileId,
    /// Owning user.
    pub user_uuid: UserId,
    /// File title.
    pub title: String,
    /// Raw markdown body.
    pub content: String,
    /// Containing folder. `None` means root level.
    pub folder_uuid: Option<FolderId>,
    /// Pin flag; pinned files list before unpinned ones.
    pub is_pinned: bool,
    /// Normalized tag set, sorted ascending.
    pub tags: Vec<String>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp; the file recency key.
    pub updated_at: i64,
}

impl PinSortable for NoteFile {
    fn pinned(&self) -> bool {
        self.is_pinned
    }

    fn recency_epoch_ms(&self) -> i64 {
        self.updated_at
    }

    fn order_id(&self) -> Uuid {
        self.uuid
    }
}

/// Validates a file title.
pub fn validate_file_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::FileTitleBlank);
    }
    let length = title.chars().count();
    if length > FILE_TITLE_MAX_CHARS {
        return Err(ValidationError::FileTitleTooLong { length });
    }
    Ok(())
}

/// Validates file content length. Empty content is allowed.
pub fn validate_file_content(content: &str) -> Result<(), ValidationError> {
    let length = content.chars().count();
    if length > FILE_CONTENT_MAX_CHARS {
        return Err(ValidationError::FileContentTooLong { length });
    }
    Ok(())
}

/// Normalizes one tag: trim, lowercase, shape checks.
pub fn normalize_tag(tag: &str) -> Result<String, ValidationError> {
    let normalized = tag.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ValidationError::TagBlank);
    }
    if normalized.chars().count() > TAG_MAX_CHARS {
        return Err(ValidationError::TagTooLong {
            tag: normalized.clone(),
        });
    }
    if TAG_WHITESPACE_RE.is_match(&normalized) {
        return Err(ValidationError::TagContainsWhitespace { tag: normalized });
    }
    Ok(normalized)
}

/// Normalizes a tag list into a sorted, deduplicated set.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut set = BTreeSet::new();
    for tag in tags {
        set.insert(normalize_tag(tag)?);
    }
    Ok(set.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag, normalize_tags, validate_file_content, validate_file_title};
    use crate::model::ValidationError;

    #[test]
    fn title_limits() {
        validate_file_title("Meeting notes").unwrap();
        assert_eq!(
            validate_file_title("").unwrap_err(),
            ValidationError::FileTitleBlank
        );
        assert!(matches!(
            validate_file_title(&"t".repeat(201)).unwrap_err(),
            ValidationError::FileTitleTooLong { length: 201 }
        ));
    }

    #[test]
    fn empty_content_is_allowed_but_oversize_is_not() {
        validate_file_content("").unwrap();
        validate_file_content(&"c".repeat(50_000)).unwrap();
        assert!(matches!(
            validate_file_content(&"c".repeat(50_001)).unwrap_err(),
            ValidationError::FileContentTooLong { length: 50_001 }
        ));
    }

    #[test]
    fn tag_is_trimmed_and_lowercased() {
        assert_eq!(normalize_tag("  Rust ").unwrap(), "rust");
    }

    #[test]
    fn tag_shape_violations_are_rejected() {
        assert_eq!(normalize_tag("  ").unwrap_err(), ValidationError::TagBlank);
        assert!(matches!(
            normalize_tag(&"t".repeat(31)).unwrap_err(),
            ValidationError::TagTooLong { .. }
        ));
        assert!(matches!(
            normalize_tag("two words").unwrap_err(),
            ValidationError::TagContainsWhitespace { .. }
        ));
    }

    #[test]
    fn tag_set_is_deduplicated_and_sorted() {
        let tags = vec![
            "Work".to_string(),
            "ideas".to_string(),
            "work".to_string(),
        ];
        assert_eq!(normalize_tags(&tags).unwrap(), vec!["ideas", "work"]);
    }
}
