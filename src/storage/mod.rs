//! Storage layer - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - places(id, name, country, continent, category, description,
//!   priority, visited, visited_date)

pub mod schema;
pub mod sqlite;

pub use sqlite::{BucketStats, SqliteStore};
