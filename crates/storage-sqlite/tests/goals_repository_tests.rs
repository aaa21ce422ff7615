//! Integration tests for the SQLite goal repository.
//!
//! Each test runs against a fresh database in a temporary directory, with
//! the real migrations and the real write actor.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use diesel::prelude::*;
use tempfile::TempDir;

use failforward_core::errors::Error;
use failforward_core::goals::{
    GoalRepositoryTrait, GoalService, GoalServiceTrait, GoalUpdate, NewFailureLog, NewGoal,
    StreakStatus,
};
use failforward_storage_sqlite::goals::FailureLogDB;
use failforward_storage_sqlite::schema::failure_logs;
use failforward_storage_sqlite::{
    create_pool, get_connection, run_migrations, spawn_writer, GoalRepository,
};

struct TestDb {
    repo: Arc<GoalRepository>,
    pool: Arc<failforward_storage_sqlite::DbPool>,
    writer: failforward_storage_sqlite::WriteHandle,
    // Held so the directory outlives the test.
    _dir: TempDir,
}

fn setup() -> TestDb {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("failforward.db");
    let pool = create_pool(db_path.to_str().unwrap()).expect("create pool");
    run_migrations(&pool).expect("run migrations");
    let writer = spawn_writer(pool.clone());
    let repo = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    TestDb {
        repo,
        pool,
        writer,
        _dir: dir,
    }
}

fn new_goal(target: i32) -> NewGoal {
    NewGoal {
        title: "Pitch to investors".to_string(),
        description: "Collect rejections until one says yes".to_string(),
        category: "business".to_string(),
        target_failures: target,
    }
}

fn new_log(description: &str) -> NewFailureLog {
    NewFailureLog {
        description: description.to_string(),
        learned_from: "something useful".to_string(),
    }
}

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn create_get_list_round_trip() {
    let db = setup();

    let created = db.repo.create(new_goal(3)).await.unwrap();
    assert_eq!(created.current_failures, 0);
    assert_eq!(created.streak_status, StreakStatus::Broken);

    let fetched = db.repo.get_by_id(&created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let listed = db.repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);

    assert!(db.repo.get_by_id("no-such-id").unwrap().is_none());
}

#[tokio::test]
async fn update_applies_partial_fields_and_reports_missing() {
    let db = setup();
    let goal = db.repo.create(new_goal(3)).await.unwrap();

    let updated = db
        .repo
        .update(
            &goal.id,
            GoalUpdate {
                title: Some("Pitch harder".to_string()),
                target_failures: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Pitch harder");
    assert_eq!(updated.target_failures, 7);
    assert_eq!(updated.description, goal.description);
    assert!(updated.updated_at >= goal.updated_at);

    let err = db
        .repo
        .update("missing", GoalUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn append_failure_walks_the_streak_windows() {
    let db = setup();
    let goal = db.repo.create(new_goal(3)).await.unwrap();

    let first = db
        .repo
        .append_failure(&goal.id, new_log("first"), t0())
        .await
        .unwrap();
    assert_eq!(first.current_failures, 1);
    assert_eq!(first.current_streak, 1);
    assert_eq!(first.streak_status, StreakStatus::Active);
    assert_eq!(first.last_failure_at, Some(t0()));

    let second_at = t0() + Duration::hours(10);
    let second = db
        .repo
        .append_failure(&goal.id, new_log("second"), second_at)
        .await
        .unwrap();
    assert_eq!(second.current_streak, 2);
    assert_eq!(second.streak_status, StreakStatus::Active);
    assert!(!second.is_completed);

    // 30h after the second failure: grace window, and the target is reached.
    let third_at = second_at + Duration::hours(30);
    let third = db
        .repo
        .append_failure(&goal.id, new_log("third"), third_at)
        .await
        .unwrap();
    assert_eq!(third.current_failures, 3);
    assert_eq!(third.current_streak, 2);
    assert_eq!(third.streak_status, StreakStatus::Warning);
    assert!(third.is_completed);

    // Returned logs are newest-first and include the new entry.
    assert_eq!(third.logs.len(), 3);
    assert_eq!(third.logs[0].description, "third");
    assert_eq!(third.logs[2].description, "first");

    // State survives a reload.
    let reloaded = db.repo.get_by_id(&goal.id).unwrap().unwrap();
    assert_eq!(reloaded, third);
}

#[tokio::test]
async fn streak_resets_past_the_grace_window() {
    let db = setup();
    let goal = db.repo.create(new_goal(10)).await.unwrap();

    db.repo
        .append_failure(&goal.id, new_log("first"), t0())
        .await
        .unwrap();
    let after = db
        .repo
        .append_failure(&goal.id, new_log("late"), t0() + Duration::hours(40))
        .await
        .unwrap();
    assert_eq!(after.current_streak, 1);
    assert_eq!(after.streak_status, StreakStatus::Broken);
    assert_eq!(after.current_failures, 2);
}

#[tokio::test]
async fn append_failure_on_missing_goal_is_not_found() {
    let db = setup();
    let err = db
        .repo
        .append_failure("missing", new_log("x"), t0())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn delete_cascades_to_logs_and_is_idempotent() {
    let db = setup();
    let goal = db.repo.create(new_goal(5)).await.unwrap();
    db.repo
        .append_failure(&goal.id, new_log("one"), t0())
        .await
        .unwrap();
    db.repo
        .append_failure(&goal.id, new_log("two"), t0() + Duration::hours(1))
        .await
        .unwrap();

    let deleted = db.repo.delete(&goal.id).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(db.repo.get_by_id(&goal.id).unwrap().is_none());
    assert!(db.repo.list_failure_logs(&goal.id).unwrap().is_empty());

    // Deleting again reports zero rows but is not an error.
    let deleted_again = db.repo.delete(&goal.id).await.unwrap();
    assert_eq!(deleted_again, 0);
}

#[tokio::test]
async fn counter_always_equals_persisted_log_count() {
    let db = setup();
    let goal = db.repo.create(new_goal(100)).await.unwrap();

    for i in 0..5 {
        let updated = db
            .repo
            .append_failure(
                &goal.id,
                new_log(&format!("attempt {}", i)),
                t0() + Duration::hours(i),
            )
            .await
            .unwrap();
        let logs = db.repo.list_failure_logs(&goal.id).unwrap();
        assert_eq!(updated.current_failures as usize, logs.len());
    }
}

#[tokio::test]
async fn failed_job_rolls_back_both_records() {
    let db = setup();
    let goal = db.repo.create(new_goal(5)).await.unwrap();
    let goal_id = goal.id.clone();

    // Simulate a failure injected between the log-write and the goal-write:
    // the job inserts the log row and then errors before touching the goal.
    let result: Result<(), Error> = db
        .writer
        .exec(move |conn| {
            diesel::insert_into(failure_logs::table)
                .values(FailureLogDB {
                    id: "orphan-to-be".to_string(),
                    goal_id: goal_id.clone(),
                    description: "half-written".to_string(),
                    learned_from: "nothing yet".to_string(),
                    created_at: t0().to_rfc3339(),
                })
                .execute(conn)
                .map_err(|e| Error::Unexpected(e.to_string()))?;
            Err(Error::Unexpected("injected failure".to_string()))
        })
        .await;
    assert!(result.is_err());

    // Neither record reflects the aborted write.
    assert!(db.repo.list_failure_logs(&goal.id).unwrap().is_empty());
    let reloaded = db.repo.get_by_id(&goal.id).unwrap().unwrap();
    assert_eq!(reloaded.current_failures, 0);
}

#[tokio::test]
async fn corrupted_rows_degrade_to_absence() {
    let db = setup();
    let goal = db.repo.create(new_goal(5)).await.unwrap();

    // Mangle the stored timestamp directly.
    {
        use failforward_storage_sqlite::schema::goals;
        let mut conn = get_connection(&db.pool).unwrap();
        diesel::update(goals::table.find(&goal.id))
            .set(goals::created_at.eq("not-a-timestamp"))
            .execute(&mut conn)
            .unwrap();
    }

    // The corrupted row is skipped rather than crashing the caller.
    assert!(db.repo.list().unwrap().is_empty());
    assert!(db.repo.get_by_id(&goal.id).unwrap().is_none());
}

#[tokio::test]
async fn service_over_sqlite_end_to_end() {
    let db = setup();
    let service = GoalService::new(db.repo.clone());

    let goal = service.create_goal(new_goal(2)).await.unwrap();
    service
        .log_failure(&goal.id, new_log("tripped"))
        .await
        .unwrap();
    let done = service
        .log_failure(&goal.id, new_log("tripped again"))
        .await
        .unwrap();
    assert!(done.is_completed);
    assert_eq!(done.logs.len(), 2);

    service.delete_goal(&goal.id).await.unwrap();
    assert!(service.get_goal(&goal.id).unwrap().is_none());
}
