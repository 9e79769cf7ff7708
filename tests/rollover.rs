use daylytics_core::db::open_db_in_memory;
use daylytics_core::{
    ArchiveRepository, DayKey, RolloverEngine, RolloverOutcome, SqliteArchiveRepository,
    SqliteTaskRepository, SqliteUserRepository, TaskRepository, UserId, UserRepository,
    UserSettings,
};
use rusqlite::Connection;
use std::sync::atomic::AtomicBool;

#[test]
fn rollover_snapshots_counts_and_retires_the_day() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let day = DayKey::parse("2024-05-01").unwrap();

    let mut created = Vec::new();
    for title in ["a", "b", "c", "d"] {
        created.push(tasks.create_task(user, title, day).unwrap());
    }
    tasks.toggle_done(user, created[0].uuid).unwrap();
    tasks.toggle_done(user, created[2].uuid).unwrap();

    let engine = engine(&conn);
    let outcome = engine.rollover_user(user, Some(day)).unwrap();
    let archive = match outcome {
        RolloverOutcome::Archived(archive) => archive,
        other => panic!("unexpected outcome: {other:?}"),
    };

    assert_eq!(archive.user_uuid, user);
    assert_eq!(archive.day, day);
    assert_eq!(archive.total, 4);
    assert_eq!(archive.completed, 2);
    assert_eq!(archive.percentage, 50);

    assert!(tasks.list_by_day(user, day).unwrap().is_empty());

    let history = engine.list_archives(user).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].uuid, archive.uuid);
}

#[test]
fn repeated_rollover_reports_existing_archive_and_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let day = DayKey::parse("2024-05-01").unwrap();

    tasks.create_task(user, "only task", day).unwrap();

    let engine = engine(&conn);
    let first = engine.rollover_user(user, Some(day)).unwrap();
    assert!(matches!(first, RolloverOutcome::Archived(_)));

    // A task created after the rollover must not disturb the frozen snapshot.
    tasks.create_task(user, "late arrival", day).unwrap();

    let second = engine.rollover_user(user, Some(day)).unwrap();
    assert_eq!(second, RolloverOutcome::AlreadyArchived);

    assert_eq!(archive_row_count(&conn, user, day), 1);
    let history = engine.list_archives(user).unwrap();
    assert_eq!(history[0].total, 1);
    // The late task survives; only the original bucket was retired.
    assert_eq!(tasks.list_by_day(user, day).unwrap().len(), 1);
}

#[test]
fn empty_day_is_skipped_without_an_archive_row() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let day = DayKey::parse("2024-05-01").unwrap();

    let engine = engine(&conn);
    let outcome = engine.rollover_user(user, Some(day)).unwrap();
    assert_eq!(outcome, RolloverOutcome::SkippedNoTasks);
    assert_eq!(archive_row_count(&conn, user, day), 0);
}

#[test]
fn percentage_rounds_half_up() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let day = DayKey::parse("2024-05-01").unwrap();

    // 1 of 8 done is 12.5%, which must round to 13.
    let mut created = Vec::new();
    for index in 0..8 {
        created.push(tasks.create_task(user, &format!("task {index}"), day).unwrap());
    }
    tasks.toggle_done(user, created[0].uuid).unwrap();

    let outcome = engine(&conn).rollover_user(user, Some(day)).unwrap();
    match outcome {
        RolloverOutcome::Archived(archive) => assert_eq!(archive.percentage, 13),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn batch_rollover_visits_every_user_and_records_mixed_outcomes() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice@example.com");
    let bob = seed_user(&conn, "bob@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let day = DayKey::parse("2024-05-01").unwrap();

    tasks.create_task(alice, "done today", day).unwrap();
    // Bob has nothing on that day.

    let engine = engine(&conn);
    let run = engine
        .rollover_all(Some(day), &AtomicBool::new(false))
        .unwrap();

    assert_eq!(run.day, day);
    assert!(!run.cancelled);
    assert_eq!(run.outcomes.len(), 2);
    assert_eq!(run.archived_count(), 1);
    assert_eq!(run.failed_count(), 0);

    let by_user = |user: UserId| {
        run.outcomes
            .iter()
            .find(|entry| entry.user_uuid == user)
            .unwrap()
    };
    assert!(matches!(
        by_user(alice).outcome,
        Ok(RolloverOutcome::Archived(_))
    ));
    assert!(matches!(
        by_user(bob).outcome,
        Ok(RolloverOutcome::SkippedNoTasks)
    ));
}

#[test]
fn batch_rollover_is_rerunnable_without_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let day = DayKey::parse("2024-05-01").unwrap();

    tasks.create_task(user, "once", day).unwrap();

    let engine = engine(&conn);
    let no_cancel = AtomicBool::new(false);
    engine.rollover_all(Some(day), &no_cancel).unwrap();
    let rerun = engine.rollover_all(Some(day), &no_cancel).unwrap();

    assert_eq!(rerun.archived_count(), 0);
    assert!(matches!(
        rerun.outcomes[0].outcome,
        Ok(RolloverOutcome::AlreadyArchived)
    ));
    assert_eq!(archive_row_count(&conn, user, day), 1);
}

#[test]
fn cancelled_batch_stops_before_visiting_users() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let day = DayKey::parse("2024-05-01").unwrap();

    tasks.create_task(user, "never archived", day).unwrap();

    let run = engine(&conn)
        .rollover_all(Some(day), &AtomicBool::new(true))
        .unwrap();

    assert!(run.cancelled);
    assert!(run.outcomes.is_empty());
    assert_eq!(archive_row_count(&conn, user, day), 0);
    assert_eq!(tasks.list_by_day(user, day).unwrap().len(), 1);
}

#[test]
fn archive_history_lists_most_recent_day_first() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let engine = engine(&conn);

    for raw in ["2024-04-29", "2024-05-01", "2024-04-30"] {
        let day = DayKey::parse(raw).unwrap();
        tasks.create_task(user, "task", day).unwrap();
        engine.rollover_user(user, Some(day)).unwrap();
    }

    let history = engine.list_archives(user).unwrap();
    let days: Vec<_> = history.iter().map(|entry| entry.day.to_string()).collect();
    assert_eq!(days, vec!["2024-05-01", "2024-04-30", "2024-04-29"]);
}

#[test]
fn archives_are_scoped_per_user() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice@example.com");
    let bob = seed_user(&conn, "bob@example.com");
    let tasks = SqliteTaskRepository::new(&conn);
    let day = DayKey::parse("2024-05-01").unwrap();

    tasks.create_task(alice, "alice task", day).unwrap();
    tasks.create_task(bob, "bob task", day).unwrap();

    let archives = SqliteArchiveRepository::new(&conn);
    archives.archive_day(alice, day).unwrap();

    assert!(archives.get_archive(alice, day).unwrap().is_some());
    assert!(archives.get_archive(bob, day).unwrap().is_none());
    assert_eq!(tasks.list_by_day(bob, day).unwrap().len(), 1);
}

#[test]
fn corrupt_archive_statistics_are_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice@example.com");
    let day = DayKey::parse("2024-05-01").unwrap();

    // A total beyond u32 must surface as invalid data, not wrap silently.
    conn.execute(
        "INSERT INTO daily_archives (uuid, user_uuid, day, total, completed, percentage)
         VALUES (?1, ?2, ?3, 5000000000, 1, 50);",
        rusqlite::params![
            uuid::Uuid::new_v4().to_string(),
            user.to_string(),
            day.to_string()
        ],
    )
    .unwrap();

    let err = SqliteArchiveRepository::new(&conn)
        .get_archive(user, day)
        .unwrap_err();
    assert!(matches!(err, daylytics_core::StoreError::InvalidData(_)));
}

fn engine(
    conn: &Connection,
) -> RolloverEngine<SqliteArchiveRepository<'_>, SqliteUserRepository<'_>> {
    RolloverEngine::new(
        SqliteArchiveRepository::new(conn),
        SqliteUserRepository::new(conn),
    )
}

fn seed_user(conn: &Connection, email: &str) -> UserId {
    SqliteUserRepository::new(conn)
        .create_user("Test User", email, "hash", &UserSettings::default())
        .unwrap()
        .uuid
}

fn archive_row_count(conn: &Connection, user: UserId, day: DayKey) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM daily_archives WHERE user_uuid = ?1 AND day = ?2;",
        rusqlite::params![user.to_string(), day.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}
