//! # TaskTrack Shared Library
//!
//! This crate holds the schema declaration, the non-destructive schema
//! reconciler and the seed loader for the TaskTrack database (users, reports
//! and tasks).
//!
//! ## Module Organization
//!
//! - `schema`: Declared tables, columns, constraints and relationships
//! - `db`: Connection pool, live schema introspection and reconciliation
//! - `auth`: Credential hashing applied before a user is first persisted
//! - `models`: Row types, creation inputs and batch inserts
//! - `seed`: Seed dataset, key resolution and the ordered batch loader
//! - `error`: Common error types

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod seed;

pub use error::{SeedError, SeedResult};

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
