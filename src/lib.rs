//! # Wanderlist - Travel Bucket List Tracker
//!
//! A single-user bucket list of places to visit, kept in SQLite.
//!
//! Wanderlist provides:
//! - A `Place` record with fixed continent, category and priority sets
//! - Filterable, sortable, paginated listings over SQLite storage
//! - An axum web surface for browsing and editing the list
//! - Aggregate stats, CSV export, a random pick and a visited timeline

pub mod place;
pub mod query;
pub mod storage;
pub mod export;
pub mod config;
pub mod server;
pub mod ui;

// Re-exports for convenient access
pub use place::{Category, Continent, NewPlace, Place, PlaceForm, Priority};
pub use query::{PlaceFilter, PlaceQuery, SortOrder, VisitStatus};
pub use storage::{BucketStats, SqliteStore};

/// Result type alias for Wanderlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Wanderlist operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Place {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
