//! SQLite repository for goals and their failure logs.
//!
//! Reads go straight to the connection pool; every mutation is executed by
//! the write actor, whose per-job immediate transaction makes the
//! multi-record writes (`append_failure`, the cascade in `delete`) atomic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::warn;
use uuid::Uuid;

use failforward_core::errors::{DatabaseError, Error, Result};
use failforward_core::goals::{FailureLog, Goal, GoalRepositoryTrait, GoalUpdate, NewFailureLog, NewGoal};

use super::model::{FailureLogDB, GoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{failure_logs, goals};

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

/// Converts loaded log rows, dropping any that fail to decode.
fn to_domain_logs(logs_db: Vec<FailureLogDB>) -> Vec<FailureLog> {
    logs_db
        .into_iter()
        .filter_map(|log_db| {
            let log_id = log_db.id.clone();
            match FailureLog::try_from(log_db) {
                Ok(log) => Some(log),
                Err(e) => {
                    warn!("Skipping corrupted failure log {}: {}", log_id, e);
                    None
                }
            }
        })
        .collect()
}

/// Loads a goal's logs newest-first on the given connection.
fn load_logs(conn: &mut SqliteConnection, goal_id: &str) -> Result<Vec<FailureLog>> {
    let logs_db = failure_logs::table
        .filter(failure_logs::goal_id.eq(goal_id))
        .order(failure_logs::created_at.desc())
        .load::<FailureLogDB>(conn)
        .into_core()?;
    Ok(to_domain_logs(logs_db))
}

/// Loads a goal row by id inside a write job, mapping absence to the domain
/// `NotFound` and an undecodable row to an internal storage error.
fn load_goal_for_write(conn: &mut SqliteConnection, goal_id: &str) -> Result<Goal> {
    let goal_db = goals::table
        .find(goal_id)
        .first::<GoalDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::NotFound(format!("Goal {} not found", goal_id)))?;

    Goal::try_from(goal_db).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "corrupted goal record {}: {}",
            goal_id, e
        )))
    })
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn list(&self) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;

        let goals_db = goals::table
            .order(goals::created_at.asc())
            .load::<GoalDB>(&mut conn)
            .into_core()?;

        let grouped_logs = FailureLogDB::belonging_to(&goals_db)
            .order(failure_logs::created_at.desc())
            .load::<FailureLogDB>(&mut conn)
            .into_core()?
            .grouped_by(&goals_db);

        let mut result = Vec::with_capacity(goals_db.len());
        for (goal_db, logs_db) in goals_db.into_iter().zip(grouped_logs) {
            let goal_id = goal_db.id.clone();
            match Goal::try_from(goal_db) {
                Ok(mut goal) => {
                    goal.logs = to_domain_logs(logs_db);
                    result.push(goal);
                }
                // Corrupted rows degrade to absence instead of failing the
                // whole read.
                Err(e) => warn!("Skipping corrupted goal record {}: {}", goal_id, e),
            }
        }
        Ok(result)
    }

    fn get_by_id(&self, goal_id: &str) -> Result<Option<Goal>> {
        let mut conn = get_connection(&self.pool)?;

        let goal_db = match goals::table
            .find(goal_id)
            .first::<GoalDB>(&mut conn)
            .optional()
            .into_core()?
        {
            Some(goal_db) => goal_db,
            None => return Ok(None),
        };

        match Goal::try_from(goal_db) {
            Ok(mut goal) => {
                goal.logs = load_logs(&mut conn, goal_id)?;
                Ok(Some(goal))
            }
            Err(e) => {
                warn!("Skipping corrupted goal record {}: {}", goal_id, e);
                Ok(None)
            }
        }
    }

    async fn create(&self, new_goal: NewGoal) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let goal = new_goal.into_goal(Uuid::new_v4().to_string(), Utc::now());

                diesel::insert_into(goals::table)
                    .values(GoalDB::from(&goal))
                    .execute(conn)
                    .into_core()?;
                Ok(goal)
            })
            .await
    }

    async fn update(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let mut goal = load_goal_for_write(conn, &goal_id)?;
                update.apply_to(&mut goal, Utc::now());

                diesel::update(goals::table.find(&goal_id))
                    .set(GoalDB::from(&goal))
                    .execute(conn)
                    .into_core()?;

                goal.logs = load_logs(conn, &goal_id)?;
                Ok(goal)
            })
            .await
    }

    async fn delete(&self, goal_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Logs first, then the goal, inside the job's transaction:
                // no orphaned logs are ever observable.
                diesel::delete(failure_logs::table.filter(failure_logs::goal_id.eq(&goal_id)))
                    .execute(conn)
                    .into_core()?;

                diesel::delete(goals::table.find(&goal_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn append_failure(
        &self,
        goal_id: &str,
        new_log: NewFailureLog,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let mut goal = load_goal_for_write(conn, &goal_id)?;
                goal.record_failure(now);

                let log = new_log.into_log(Uuid::new_v4().to_string(), &goal_id, now);

                // Both records in one transaction: the new log and the
                // goal's advanced counters commit or roll back together.
                diesel::insert_into(failure_logs::table)
                    .values(FailureLogDB::from(&log))
                    .execute(conn)
                    .into_core()?;

                diesel::update(goals::table.find(&goal_id))
                    .set(GoalDB::from(&goal))
                    .execute(conn)
                    .into_core()?;

                goal.logs = load_logs(conn, &goal_id)?;
                Ok(goal)
            })
            .await
    }

    fn list_failure_logs(&self, goal_id: &str) -> Result<Vec<FailureLog>> {
        let mut conn = get_connection(&self.pool)?;
        load_logs(&mut conn, goal_id)
    }
}
