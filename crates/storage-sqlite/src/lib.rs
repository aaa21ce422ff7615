//! SQLite storage implementation for FailForward.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `failforward-core` and contains:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - The single-writer actor that serializes all mutations through one
//!   connection, each job wrapped in an immediate transaction
//! - The goal/failure-log repository and its database model types
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist; `failforward-core` is database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod goals;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use goals::GoalRepository;

// Re-export from failforward-core for convenience
pub use failforward_core::errors::{DatabaseError, Error, Result};
