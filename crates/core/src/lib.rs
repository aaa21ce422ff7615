//! FailForward Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for FailForward:
//! goal records, failure logs, the streak engine, and the service
//! layer. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod errors;
pub mod goals;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
