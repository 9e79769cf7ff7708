//! Task domain model.
//!
//! # Responsibility
//! - Define the read model for one dated to-do item.
//! - Own the title validation contract shared by create and rename.
//!
//! # Invariants
//! - A task always belongs to one user and one calendar day.
//! - Titles are non-blank, at most 500 characters and at most 50 words.

use crate::model::day::DayKey;
use crate::model::user::UserId;
use crate::model::{ValidationError, TASK_TITLE_MAX_CHARS, TASK_TITLE_MAX_WORDS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// One user-owned to-do item scoped to a single calendar day.
///
/// Tasks live only until their day is rolled over; the rollover replaces the
/// whole `(user, day)` bucket with a `DailyArchive` snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable task id.
    pub uuid: TaskId,
    /// Owning user.
    pub user_uuid: UserId,
    /// Task title.
    pub title: String,
    /// Calendar day this task belongs to.
    pub day: DayKey,
    /// Completion flag, toggled in place.
    pub done: bool,
    /// Epoch ms creation timestamp; listing order within a day.
    pub created_at: i64,
}

/// Validates a task title for create and rename paths.
pub fn validate_task_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TaskTitleBlank);
    }

    let length = title.chars().count();
    if length > TASK_TITLE_MAX_CHARS {
        return Err(ValidationError::TaskTitleTooLong { length });
    }

    let words = title.split_whitespace().count();
    if words > TASK_TITLE_MAX_WORDS {
        return Err(ValidationError::TaskTitleTooManyWords { words });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_task_title;
    use crate::model::ValidationError;

    #[test]
    fn accepts_plain_title() {
        validate_task_title("Water the plants").unwrap();
    }

    #[test]
    fn rejects_blank_title() {
        assert_eq!(
            validate_task_title("   ").unwrap_err(),
            ValidationError::TaskTitleBlank
        );
    }

    #[test]
    fn rejects_title_over_500_chars() {
        let title = "x".repeat(501);
        assert!(matches!(
            validate_task_title(&title).unwrap_err(),
            ValidationError::TaskTitleTooLong { length: 501 }
        ));
    }

    #[test]
    fn accepts_exactly_50_words_and_rejects_51() {
        let fifty = vec!["word"; 50].join(" ");
        validate_task_title(&fifty).unwrap();

        let fifty_one = vec!["word"; 51].join(" ");
        assert!(matches!(
            validate_task_title(&fifty_one).unwrap_err(),
            ValidationError::TaskTitleTooManyWords { words: 51 }
        ));
    }
}
