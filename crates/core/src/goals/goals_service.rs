//! Goal service - validation and coordination on top of the repository.

use std::sync::Arc;

use chrono::Utc;
use log::debug;

use super::goals_model::{FailureLog, Goal, GoalUpdate, NewFailureLog, NewGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::errors::Result;

/// Service for managing goals and their failure logs.
///
/// Sole writer of goal state: every mutation flows through here, and the
/// failure-derived fields are recomputed only on the `log_failure` path.
pub struct GoalService {
    repository: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    /// Creates a new GoalService instance.
    pub fn new(repository: Arc<dyn GoalRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl GoalServiceTrait for GoalService {
    fn list_goals(&self) -> Result<Vec<Goal>> {
        self.repository.list()
    }

    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        self.repository.get_by_id(goal_id)
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        debug!("Creating goal '{}'", new_goal.title);
        self.repository.create(new_goal).await
    }

    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        update.validate()?;
        self.repository.update(goal_id, update).await
    }

    /// Deletes a goal and, atomically, all of its failure logs.
    ///
    /// Deleting a nonexistent goal is a successful no-op: the end state
    /// (no such goal) is achieved either way.
    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        let deleted = self.repository.delete(goal_id).await?;
        if deleted == 0 {
            debug!("Delete of goal {} was a no-op (already gone)", goal_id);
        }
        Ok(())
    }

    /// Logs one failure: counter, completion, and streak are advanced and
    /// the new log is persisted in a single transaction.
    ///
    /// The timestamp is taken once here so the streak decision and the
    /// stored `lastFailureAt`/`createdAt` agree exactly.
    async fn log_failure(&self, goal_id: &str, new_log: NewFailureLog) -> Result<Goal> {
        new_log.validate()?;
        let now = Utc::now();
        self.repository.append_failure(goal_id, new_log, now).await
    }

    fn get_failure_logs(&self, goal_id: &str) -> Result<Vec<FailureLog>> {
        self.repository.list_failure_logs(goal_id)
    }
}
