//! Goal and failure log domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::goals_constants::*;
use super::goals_streak::advance_streak;
use crate::errors::{Error, Result, ValidationError};

/// Recency classification of a goal's streak.
///
/// Stored as lowercase text and recomputed only when a failure is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StreakStatus {
    /// The last failure was logged within the continuation window.
    Active,
    /// Inside the grace window: streak preserved but at risk.
    Warning,
    /// No streak, or the grace window elapsed.
    #[default]
    Broken,
}

impl StreakStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakStatus::Active => STREAK_STATUS_ACTIVE,
            StreakStatus::Warning => STREAK_STATUS_WARNING,
            StreakStatus::Broken => STREAK_STATUS_BROKEN,
        }
    }
}

impl fmt::Display for StreakStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreakStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            STREAK_STATUS_ACTIVE => Ok(StreakStatus::Active),
            STREAK_STATUS_WARNING => Ok(StreakStatus::Warning),
            STREAK_STATUS_BROKEN => Ok(StreakStatus::Broken),
            _ => Err(format!("Unknown streak status: {}", s)),
        }
    }
}

/// Domain model representing a goal (a "quest" to practice failing at).
///
/// The derived fields (`current_failures`, `is_completed`, `current_streak`,
/// `streak_status`, `last_failure_at`) are only ever written by
/// [`Goal::record_failure`], which the storage layer invokes inside the
/// failure-logging transaction. Callers read them, never set them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Completion threshold; reaching it flips `is_completed`.
    pub target_failures: i32,
    /// Count of failures logged so far. Equals the number of persisted
    /// failure logs for this goal at all observable times.
    pub current_failures: i32,
    pub is_completed: bool,
    /// Consecutive qualifying days of logging activity.
    pub current_streak: i32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub streak_status: StreakStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Failure logs for this goal, newest first. Populated on reads.
    #[serde(default)]
    pub logs: Vec<FailureLog>,
}

impl Goal {
    /// Applies one logged failure to this goal's derived state.
    ///
    /// Increments the failure counter, recomputes completion, advances the
    /// streak based on the time elapsed since the previous failure, and
    /// stamps `last_failure_at`/`updated_at` with `now`. Completion is
    /// one-way: the counter never decreases, so once reached it stays set.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.current_failures += 1;
        self.is_completed = self.current_failures >= self.target_failures;

        let (streak, status) = advance_streak(self.current_streak, self.last_failure_at, now);
        self.current_streak = streak;
        self.streak_status = status;
        self.last_failure_at = Some(now);
        self.updated_at = now;
    }
}

/// One recorded failure event with reflection text, attributed to a goal.
///
/// Created only through the failure-logging operation and removed only by
/// cascade delete of the owning goal; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailureLog {
    pub id: String,
    pub goal_id: String,
    /// What happened.
    pub description: String,
    /// What was learned.
    pub learned_from: String,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a new goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub category: String,
    pub target_failures: i32,
}

impl NewGoal {
    /// Validates the new goal data.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Goal title cannot be empty".to_string(),
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Goal category cannot be empty".to_string(),
            )));
        }
        if self.target_failures < MIN_TARGET_FAILURES {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Target failures must be at least {}, got {}",
                MIN_TARGET_FAILURES, self.target_failures
            ))));
        }
        Ok(())
    }

    /// Builds the initial goal record: zeroed counters, no streak, no logs.
    pub fn into_goal(self, goal_id: String, now: DateTime<Utc>) -> Goal {
        Goal {
            id: goal_id,
            title: self.title,
            description: self.description,
            category: self.category,
            target_failures: self.target_failures,
            current_failures: 0,
            is_completed: false,
            current_streak: 0,
            last_failure_at: None,
            streak_status: StreakStatus::Broken,
            created_at: now,
            updated_at: now,
            logs: Vec::new(),
        }
    }
}

/// Input model for updating an existing goal.
///
/// Only the user-editable fields; unspecified fields retain their prior
/// values. The failure-derived fields are not updatable through this path.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub target_failures: Option<i32>,
}

impl GoalUpdate {
    /// Validates the goal update data.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Goal title cannot be empty".to_string(),
                )));
            }
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Goal category cannot be empty".to_string(),
                )));
            }
        }
        if let Some(target) = self.target_failures {
            if target < MIN_TARGET_FAILURES {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Target failures must be at least {}, got {}",
                    MIN_TARGET_FAILURES, target
                ))));
            }
        }
        Ok(())
    }

    /// Applies the supplied fields onto `goal` and refreshes `updated_at`.
    ///
    /// Note: raising `target_failures` past `current_failures` does not
    /// clear `is_completed`; completion has no un-completion path.
    pub fn apply_to(self, goal: &mut Goal, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            goal.title = title;
        }
        if let Some(description) = self.description {
            goal.description = description;
        }
        if let Some(category) = self.category {
            goal.category = category;
        }
        if let Some(target) = self.target_failures {
            goal.target_failures = target;
        }
        goal.updated_at = now;
    }
}

/// Input model for logging a failure against a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFailureLog {
    pub description: String,
    pub learned_from: String,
}

impl NewFailureLog {
    /// Validates the failure log data.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "description".to_string(),
            )));
        }
        if self.learned_from.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "learnedFrom".to_string(),
            )));
        }
        Ok(())
    }

    /// Builds the persistent log record for `goal_id`.
    pub fn into_log(self, log_id: String, goal_id: &str, now: DateTime<Utc>) -> FailureLog {
        FailureLog {
            id: log_id,
            goal_id: goal_id.to_string(),
            description: self.description,
            learned_from: self.learned_from,
            created_at: now,
        }
    }
}
