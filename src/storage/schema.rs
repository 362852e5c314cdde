//! Database schema definitions

/// SQL to create the places table.
///
/// AUTOINCREMENT keeps ids monotonic so "newest first" ordering by id
/// holds even after deletions.
pub const CREATE_PLACES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS places (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    country TEXT NOT NULL,
    continent TEXT NOT NULL,
    category TEXT NOT NULL,
    description TEXT NOT NULL,
    priority TEXT NOT NULL,
    visited INTEGER NOT NULL DEFAULT 0,
    visited_date TEXT
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_places_continent ON places(continent)",
    "CREATE INDEX IF NOT EXISTS idx_places_category ON places(category)",
    "CREATE INDEX IF NOT EXISTS idx_places_visited ON places(visited)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_PLACES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
