//! Daily archive domain model.
//!
//! # Responsibility
//! - Define the immutable per-user, per-day completion snapshot.
//! - Own the round-half-up percentage rule used by the rollover.
//!
//! # Invariants
//! - Archives are append-only; no code path mutates a persisted archive.
//! - `completed <= total` and `percentage == round(completed * 100 / total)`
//!   (0 when `total == 0`, though zero-task days never produce an archive).
//! - At most one archive exists per `(user, day)` pair.

use crate::model::day::DayKey;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a daily archive.
pub type ArchiveId = Uuid;

/// Immutable completion snapshot for one user's finished day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyArchive {
    /// Stable archive id.
    pub uuid: ArchiveId,
    /// Owning user.
    pub user_uuid: UserId,
    /// Archived calendar day.
    pub day: DayKey,
    /// Number of tasks the day held at rollover time.
    pub total: u32,
    /// Number of those tasks that were done.
    pub completed: u32,
    /// Completion percentage, round-half-up.
    pub percentage: u8,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
}

impl DailyArchive {
    /// Returns whether the stored statistics satisfy the archive invariant.
    ///
    /// Read paths use this to reject corrupt persisted rows.
    pub fn is_consistent(&self) -> bool {
        self.completed <= self.total
            && self.percentage == completion_percentage(self.completed, self.total)
    }
}

/// Computes the completion percentage with round-half-up semantics.
///
/// Returns 0 when `total == 0`.
pub fn completion_percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    // Integer round-half-up: (a / b) rounded == (2a + b) / 2b truncated.
    let rounded = (u64::from(completed) * 100 * 2 + u64::from(total)) / (u64::from(total) * 2);
    rounded as u8
}
