//! SQLite storage implementation for goals.

mod model;
mod repository;

pub use model::{FailureLogDB, GoalDB};
pub use repository::GoalRepository;
