//! Goal repository and service traits.
//!
//! These traits define the contract for goal operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::goals_model::{FailureLog, Goal, GoalUpdate, NewFailureLog, NewGoal};
use crate::errors::Result;

/// Trait defining the contract for goal repository operations.
///
/// Implementations handle persistence of goals and their failure logs. The
/// multi-record operations (`append_failure`, `delete`) must be atomic: a
/// partially applied write must never be observable by a subsequent read.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    /// Loads all goals, each populated with its logs newest-first.
    fn list(&self) -> Result<Vec<Goal>>;

    /// Loads one goal with its logs, or `None` if the id does not exist.
    fn get_by_id(&self, goal_id: &str) -> Result<Option<Goal>>;

    /// Persists a new goal. The implementation generates the id.
    async fn create(&self, new_goal: NewGoal) -> Result<Goal>;

    /// Applies a partial update to an existing goal.
    ///
    /// Fails with `Error::NotFound` if the goal does not exist.
    async fn update(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal>;

    /// Deletes a goal and all of its failure logs in one transaction.
    ///
    /// Returns the number of goal records deleted (0 if the id was unknown).
    async fn delete(&self, goal_id: &str) -> Result<usize>;

    /// Records one failure: advances the goal's derived state and inserts
    /// the new log, both within a single transaction.
    ///
    /// `now` is the timestamp of the event; the streak decision and the
    /// stored `created_at`/`last_failure_at` all derive from it. Fails with
    /// `Error::NotFound` if the goal does not exist.
    async fn append_failure(
        &self,
        goal_id: &str,
        new_log: NewFailureLog,
        now: DateTime<Utc>,
    ) -> Result<Goal>;

    /// Loads the failure logs for a goal, newest-first.
    ///
    /// An unknown goal id yields an empty list, not an error.
    fn list_failure_logs(&self, goal_id: &str) -> Result<Vec<FailureLog>>;
}

/// Trait defining the contract for goal service operations.
///
/// The service layer validates input and coordinates with the repository;
/// it is the only surface the presentation layer talks to.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// Lists all goals with their logs.
    fn list_goals(&self) -> Result<Vec<Goal>>;

    /// Gets a goal by id; `None` signals a valid "not found" outcome.
    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>>;

    /// Creates a new goal after validating the input.
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;

    /// Updates the user-editable fields of a goal.
    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal>;

    /// Deletes a goal and its logs. Deleting an unknown id succeeds.
    async fn delete_goal(&self, goal_id: &str) -> Result<()>;

    /// Logs one failure against a goal and returns the updated goal.
    async fn log_failure(&self, goal_id: &str, new_log: NewFailureLog) -> Result<Goal>;

    /// Lists a goal's failure logs, newest-first.
    fn get_failure_logs(&self, goal_id: &str) -> Result<Vec<FailureLog>>;
}
