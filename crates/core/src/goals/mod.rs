//! Goals module - domain models, streak engine, services, and traits.

mod goals_constants;
mod goals_export;
mod goals_model;
mod goals_service;
mod goals_streak;
mod goals_traits;



pub use goals_constants::*;
pub use goals_export::{export_logs_csv, EXPORT_HEADERS};
pub use goals_model::{FailureLog, Goal, GoalUpdate, NewFailureLog, NewGoal, StreakStatus};
pub use goals_service::GoalService;
pub use goals_streak::advance_streak;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
