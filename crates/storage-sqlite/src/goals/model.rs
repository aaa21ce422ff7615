//! Database models for goals and failure logs.
//!
//! Timestamps are persisted as RFC 3339 text; conversion to the domain
//! models is fallible so a corrupted row can be detected (and skipped on
//! list paths) instead of crashing the caller.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use failforward_core::goals::{FailureLog, Goal, StreakStatus};
use serde::{Deserialize, Serialize};

/// Database model for goals.
#[derive(
    Insertable,
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalDB {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub target_failures: i32,
    pub current_failures: i32,
    pub is_completed: bool,
    pub current_streak: i32,
    pub last_failure_at: Option<String>,
    pub streak_status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for failure logs.
#[derive(
    Insertable,
    Queryable,
    Identifiable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(GoalDB, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::failure_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FailureLogDB {
    pub id: String,
    pub goal_id: String,
    pub description: String,
    pub learned_from: String,
    pub created_at: String,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

// Conversion to domain models. Fails on undecodable timestamps or an
// unknown streak status; callers decide whether that is a skip or an error.

impl TryFrom<GoalDB> for Goal {
    type Error = String;

    fn try_from(db: GoalDB) -> Result<Self, Self::Error> {
        let last_failure_at = db.last_failure_at.as_deref().map(parse_timestamp).transpose()?;
        Ok(Goal {
            id: db.id,
            title: db.title,
            description: db.description,
            category: db.category,
            target_failures: db.target_failures,
            current_failures: db.current_failures,
            is_completed: db.is_completed,
            current_streak: db.current_streak,
            last_failure_at,
            streak_status: db.streak_status.parse::<StreakStatus>()?,
            created_at: parse_timestamp(&db.created_at)?,
            updated_at: parse_timestamp(&db.updated_at)?,
            logs: Vec::new(),
        })
    }
}

impl TryFrom<FailureLogDB> for FailureLog {
    type Error = String;

    fn try_from(db: FailureLogDB) -> Result<Self, Self::Error> {
        Ok(FailureLog {
            id: db.id,
            goal_id: db.goal_id,
            description: db.description,
            learned_from: db.learned_from,
            created_at: parse_timestamp(&db.created_at)?,
        })
    }
}

// Conversion from domain models (logs are stored separately).

impl From<&Goal> for GoalDB {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            category: goal.category.clone(),
            target_failures: goal.target_failures,
            current_failures: goal.current_failures,
            is_completed: goal.is_completed,
            current_streak: goal.current_streak,
            last_failure_at: goal.last_failure_at.as_ref().map(format_timestamp),
            streak_status: goal.streak_status.as_str().to_string(),
            created_at: format_timestamp(&goal.created_at),
            updated_at: format_timestamp(&goal.updated_at),
        }
    }
}

impl From<&FailureLog> for FailureLogDB {
    fn from(log: &FailureLog) -> Self {
        Self {
            id: log.id.clone(),
            goal_id: log.goal_id.clone(),
            description: log.description.clone(),
            learned_from: log.learned_from.clone(),
            created_at: format_timestamp(&log.created_at),
        }
    }
}
