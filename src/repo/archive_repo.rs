//! Daily archive repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Convert a `(user, day)` task bucket into one immutable archive row and
//!   retire the bucket, atomically.
//! - Serve the archive history listing.
//!
//! # Invariants
//! - The archive insert and the task bucket delete share one immediate
//!   transaction; a crash can never leave the archive without the delete.
//! - `UNIQUE (user_uuid, day)` guarantees at most one archive per day; a
//!   repeated rollover observes the existing row and reports it, creating
//!   nothing.
//! - Archive rows are never updated after insert.

use crate::model::archive::{completion_percentage, ArchiveId, DailyArchive};
use crate::model::day::DayKey;
use crate::model::user::UserId;
use crate::repo::{parse_day, parse_uuid, StoreError, StoreResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const ARCHIVE_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    day,
    total,
    completed,
    percentage,
    created_at
FROM daily_archives";

/// Result of rolling over one `(user, day)` bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// Bucket archived and retired.
    Archived(DailyArchive),
    /// Day held no tasks; no archive row was created.
    SkippedNoTasks,
    /// An archive for this day already exists; nothing was changed.
    AlreadyArchived,
}

/// Repository interface for archive operations.
pub trait ArchiveRepository {
    /// Archives one day bucket and deletes its tasks in one transaction.
    fn archive_day(&self, user_uuid: UserId, day: DayKey) -> StoreResult<RolloverOutcome>;
    /// Loads the archive for one day, if present.
    fn get_archive(&self, user_uuid: UserId, day: DayKey) -> StoreResult<Option<DailyArchive>>;
    /// Lists the user's archives, most recent day first.
    fn list_archives(&self, user_uuid: UserId) -> StoreResult<Vec<DailyArchive>>;
}

/// SQLite-backed archive repository.
///
/// This is the only repository that spans two collections: the rollover
/// reads and deletes `tasks` while inserting into `daily_archives`.
pub struct SqliteArchiveRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArchiveRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArchiveRepository for SqliteArchiveRepository<'_> {
    fn archive_day(&self, user_uuid: UserId, day: DayKey) -> StoreResult<RolloverOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let already_archived: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM daily_archives
                WHERE user_uuid = ?1
                  AND day = ?2
            );",
            params![user_uuid.to_string(), day.to_string()],
            |row| row.get(0),
        )?;
        if already_archived == 1 {
            return Ok(RolloverOutcome::AlreadyArchived);
        }

        let (total, completed): (i64, i64) = tx.query_row(
            "SELECT COUNT(*), COALESCE(SUM(done), 0)
             FROM tasks
             WHERE user_uuid = ?1
               AND day = ?2;",
            params![user_uuid.to_string(), day.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        if total == 0 {
            return Ok(RolloverOutcome::SkippedNoTasks);
        }

        let percentage = completion_percentage(completed as u32, total as u32);
        let archive_uuid = Uuid::new_v4();
        tx.execute(
            "INSERT INTO daily_archives (uuid, user_uuid, day, total, completed, percentage)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                archive_uuid.to_string(),
                user_uuid.to_string(),
                day.to_string(),
                total,
                completed,
                i64::from(percentage),
            ],
        )?;
        tx.execute(
            "DELETE FROM tasks
             WHERE user_uuid = ?1
               AND day = ?2;",
            params![user_uuid.to_string(), day.to_string()],
        )?;

        let archive = load_required_archive(&tx, archive_uuid)?;
        tx.commit()?;
        Ok(RolloverOutcome::Archived(archive))
    }

    fn get_archive(&self, user_uuid: UserId, day: DayKey) -> StoreResult<Option<DailyArchive>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARCHIVE_SELECT_SQL}
             WHERE user_uuid = ?1
               AND day = ?2;"
        ))?;

        let mut rows = stmt.query(params![user_uuid.to_string(), day.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_archive_row(row)?));
        }
        Ok(None)
    }

    fn list_archives(&self, user_uuid: UserId) -> StoreResult<Vec<DailyArchive>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARCHIVE_SELECT_SQL}
             WHERE user_uuid = ?1
             ORDER BY day DESC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([user_uuid.to_string()])?;
        let mut archives = Vec::new();
        while let Some(row) = rows.next()? {
            archives.push(parse_archive_row(row)?);
        }
        Ok(archives)
    }
}

fn load_required_archive(conn: &Connection, archive_uuid: ArchiveId) -> StoreResult<DailyArchive> {
    let mut stmt = conn.prepare(&format!(
        "{ARCHIVE_SELECT_SQL}
         WHERE uuid = ?1;"
    ))?;
    let mut rows = stmt.query([archive_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_archive_row(row);
    }
    Err(StoreError::InvalidData(format!(
        "archive {archive_uuid} missing immediately after insert"
    )))
}

fn parse_archive_row(row: &Row<'_>) -> StoreResult<DailyArchive> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let day_text: String = row.get("day")?;

    let total: i64 = row.get("total")?;
    let completed: i64 = row.get("completed")?;
    let percentage: i64 = row.get("percentage")?;
    let out_of_range = || {
        StoreError::InvalidData(format!(
            "archive statistics out of range: total={total} completed={completed} percentage={percentage}"
        ))
    };
    let total = u32::try_from(total).map_err(|_| out_of_range())?;
    let completed = u32::try_from(completed).map_err(|_| out_of_range())?;
    if !(0..=100).contains(&percentage) {
        return Err(out_of_range());
    }

    let archive = DailyArchive {
        uuid: parse_uuid(&uuid_text, "daily_archives.uuid")?,
        user_uuid: parse_uuid(&user_text, "daily_archives.user_uuid")?,
        day: parse_day(&day_text, "daily_archives.day")?,
        total,
        completed,
        percentage: percentage as u8,
        created_at: row.get("created_at")?,
    };
    if !archive.is_consistent() {
        return Err(StoreError::InvalidData(format!(
            "archive {} violates the percentage invariant",
            archive.uuid
        )));
    }
    Ok(archive)
}
