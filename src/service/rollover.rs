//! Rollover engine: converts finished days into immutable archives.
//!
//! # Responsibility
//! - Drive per-user and batch rollover on top of the archive repository.
//! - Resolve the target day once per invocation.
//!
//! # Invariants
//! - A batch run resolves its target day exactly once; every user in the
//!   run archives the same day even if the run spans midnight.
//! - Users are processed strictly sequentially; each user's rollover is an
//!   independently committed unit and one user's failure never aborts the
//!   rest of the run.
//! - The cancellation flag is honored between users, never inside a user's
//!   transaction.

use crate::model::archive::DailyArchive;
use crate::model::day::DayKey;
use crate::model::user::UserId;
use crate::repo::archive_repo::{ArchiveRepository, RolloverOutcome};
use crate::repo::user_repo::UserRepository;
use crate::repo::{StoreError, StoreResult};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-user entry in a batch rollover report.
#[derive(Debug)]
pub struct UserRollover {
    /// User this entry belongs to.
    pub user_uuid: UserId,
    /// The user's committed outcome, or the error that was recorded.
    pub outcome: Result<RolloverOutcome, StoreError>,
}

/// Report for one batch rollover run.
#[derive(Debug)]
pub struct RolloverRun {
    /// The day every user in this run was rolled over to.
    pub day: DayKey,
    /// Per-user outcomes in visit order.
    pub outcomes: Vec<UserRollover>,
    /// Whether the run stopped early on the cancellation flag.
    pub cancelled: bool,
}

impl RolloverRun {
    /// Number of users that produced a new archive.
    pub fn archived_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|entry| matches!(entry.outcome, Ok(RolloverOutcome::Archived(_))))
            .count()
    }

    /// Number of users whose rollover failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|entry| entry.outcome.is_err())
            .count()
    }
}

/// Batch and on-demand rollover orchestration.
pub struct RolloverEngine<A: ArchiveRepository, U: UserRepository> {
    archives: A,
    users: U,
}

impl<A: ArchiveRepository, U: UserRepository> RolloverEngine<A, U> {
    /// Creates an engine from repository implementations.
    pub fn new(archives: A, users: U) -> Self {
        Self { archives, users }
    }

    /// Rolls over one user's day, defaulting to yesterday.
    pub fn rollover_user(
        &self,
        user_uuid: UserId,
        day: Option<DayKey>,
    ) -> StoreResult<RolloverOutcome> {
        let day = day.unwrap_or_else(default_rollover_day);
        let result = self.archives.archive_day(user_uuid, day);
        match &result {
            Ok(outcome) => info!(
                "event=rollover_user module=rollover status=ok user={user_uuid} day={day} outcome={}",
                outcome_label(outcome)
            ),
            Err(err) => error!(
                "event=rollover_user module=rollover status=error user={user_uuid} day={day} error={err}"
            ),
        }
        result
    }

    /// Rolls over every known user sequentially for one day, defaulting to
    /// yesterday.
    ///
    /// Per-user failures are recorded in the report and do not stop the
    /// run; already-committed users are never rolled back. `cancel` is
    /// checked between users so a long batch can be stopped cleanly.
    pub fn rollover_all(&self, day: Option<DayKey>, cancel: &AtomicBool) -> StoreResult<RolloverRun> {
        // Resolved once so a run spanning midnight stays on one target day.
        let day = day.unwrap_or_else(default_rollover_day);
        info!("event=rollover_all module=rollover status=start day={day}");

        let user_ids = self.users.list_user_ids()?;
        let mut outcomes = Vec::with_capacity(user_ids.len());
        let mut cancelled = false;

        for user_uuid in user_ids {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }

            let outcome = self.archives.archive_day(user_uuid, day);
            if let Err(err) = &outcome {
                error!(
                    "event=rollover_user module=rollover status=error user={user_uuid} day={day} error={err}"
                );
            }
            outcomes.push(UserRollover { user_uuid, outcome });
        }

        let run = RolloverRun {
            day,
            outcomes,
            cancelled,
        };
        info!(
            "event=rollover_all module=rollover status={} day={day} users={} archived={} failed={}",
            if run.cancelled { "cancelled" } else { "ok" },
            run.outcomes.len(),
            run.archived_count(),
            run.failed_count()
        );
        Ok(run)
    }

    /// Lists one user's archive history, most recent day first.
    pub fn list_archives(&self, user_uuid: UserId) -> StoreResult<Vec<DailyArchive>> {
        self.archives.list_archives(user_uuid)
    }
}

fn default_rollover_day() -> DayKey {
    DayKey::today().previous_day()
}

fn outcome_label(outcome: &RolloverOutcome) -> &'static str {
    match outcome {
        RolloverOutcome::Archived(_) => "archived",
        RolloverOutcome::SkippedNoTasks => "skipped_no_tasks",
        RolloverOutcome::AlreadyArchived => "already_archived",
    }
}
