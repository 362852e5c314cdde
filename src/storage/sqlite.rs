//! SQLite storage implementation

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde::Serialize;

use super::schema;
use crate::place::{NewPlace, Place};
use crate::query::{PER_PAGE, PlaceQuery};
use crate::Result;

const PLACE_COLUMNS: &str =
    "id, name, country, continent, category, description, priority, visited, visited_date";

/// SQLite-backed storage for the bucket list
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Place Operations ==========

    /// Insert a new place, not yet visited; returns its assigned id
    pub fn insert_place(&self, place: &NewPlace) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO places (name, country, continent, category, description, priority, visited)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
            "#,
            params![
                place.name,
                place.country,
                place.continent.as_str(),
                place.category.as_str(),
                place.description,
                place.priority.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a place by id
    pub fn get_place(&self, id: i64) -> Result<Option<Place>> {
        self.conn
            .query_row(
                &format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = ?1"),
                params![id],
                |row| self.row_to_place(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Replace the editable fields of a place, leaving the visited state
    /// alone. Returns false when the id does not exist.
    pub fn update_place(&self, id: i64, place: &NewPlace) -> Result<bool> {
        let changed = self.conn.execute(
            r#"
            UPDATE places
            SET name = ?1, country = ?2, continent = ?3, category = ?4, description = ?5, priority = ?6
            WHERE id = ?7
            "#,
            params![
                place.name,
                place.country,
                place.continent.as_str(),
                place.category.as_str(),
                place.description,
                place.priority.as_str(),
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a place; deleting an id that does not exist is a no-op
    pub fn delete_place(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM places WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Flip the visited flag. Marking a place visited stamps it with
    /// `today`; marking it unvisited clears the date. Returns the updated
    /// place, or None when the id does not exist.
    pub fn toggle_visited(&self, id: i64, today: NaiveDate) -> Result<Option<Place>> {
        let Some(place) = self.get_place(id)? else {
            return Ok(None);
        };

        let visited = !place.visited;
        let visited_date = if visited { Some(today) } else { None };
        self.conn.execute(
            "UPDATE places SET visited = ?1, visited_date = ?2 WHERE id = ?3",
            params![visited, visited_date.map(|d| d.to_string()), id],
        )?;

        Ok(Some(Place {
            visited,
            visited_date,
            ..place
        }))
    }

    // ========== Listing Operations ==========

    /// Run a filtered, sorted, paginated listing. Returns one page of
    /// places plus the total row count matching the filter.
    pub fn list_places(&self, query: &PlaceQuery) -> Result<(Vec<Place>, i64)> {
        let (where_sql, mut params) = query.filter.where_clause();

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM places{where_sql}"),
            params_from_iter(params.iter().map(|p| p.as_ref())),
            |row| row.get(0),
        )?;

        params.push(Box::new(PER_PAGE));
        params.push(Box::new(query.offset()));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PLACE_COLUMNS} FROM places{where_sql} ORDER BY {} LIMIT ? OFFSET ?",
            query.sort.as_sql()
        ))?;
        let places = stmt
            .query_map(
                params_from_iter(params.iter().map(|p| p.as_ref())),
                |row| self.row_to_place(row),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((places, total))
    }

    /// All places ordered by id, for the CSV export and the random pick
    pub fn all_places(&self) -> Result<Vec<Place>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PLACE_COLUMNS} FROM places ORDER BY id"))?;
        let places = stmt
            .query_map([], |row| self.row_to_place(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(places)
    }

    /// Visited places that carry a date, most recent first
    pub fn visited_timeline(&self) -> Result<Vec<Place>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE visited = 1 AND visited_date IS NOT NULL ORDER BY visited_date DESC, id DESC"
        ))?;
        let places = stmt
            .query_map([], |row| self.row_to_place(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(places)
    }

    // ========== Stats Operations ==========

    /// Count all places
    pub fn count_places(&self) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM places", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count visited places
    pub fn count_visited(&self) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM places WHERE visited = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Per-continent place counts, keyed by stored continent name
    pub fn count_by_continent(&self) -> Result<BTreeMap<String, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT continent, COUNT(*) FROM places GROUP BY continent")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (continent, count) = row?;
            counts.insert(continent, count);
        }
        Ok(counts)
    }

    /// Aggregate statistics for the stats endpoints and the CLI
    pub fn stats(&self) -> Result<BucketStats> {
        let total = self.count_places()?;
        let visited = self.count_visited()?;
        let completion_pct = if total == 0 {
            0.0
        } else {
            visited as f64 / total as f64 * 100.0
        };

        Ok(BucketStats {
            total,
            visited,
            not_visited: total - visited,
            by_continent: self.count_by_continent()?,
            completion_pct,
        })
    }

    fn row_to_place(&self, row: &rusqlite::Row) -> rusqlite::Result<Place> {
        let continent_str: String = row.get(3)?;
        let category_str: String = row.get(4)?;
        let priority_str: String = row.get(6)?;
        let date_str: Option<String> = row.get(8)?;

        let continent = continent_str.parse().map_err(|e: crate::Error| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let category = category_str.parse().map_err(|e: crate::Error| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let priority = priority_str.parse().map_err(|e: crate::Error| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let visited_date = date_str
            .map(|d| {
                d.parse::<NaiveDate>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        8,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })
            })
            .transpose()?;

        Ok(Place {
            id: row.get(0)?,
            name: row.get(1)?,
            country: row.get(2)?,
            continent,
            category,
            description: row.get(5)?,
            priority,
            visited: row.get(7)?,
            visited_date,
        })
    }
}

/// Aggregate counts over the whole list
#[derive(Debug, Clone, Serialize)]
pub struct BucketStats {
    pub total: i64,
    pub visited: i64,
    pub not_visited: i64,
    pub by_continent: BTreeMap<String, i64>,
    pub completion_pct: f64,
}
