//! Listing queries - filters, ordering and pagination
//!
//! A [`PlaceQuery`] is built from loose request or CLI input, then turned
//! into a WHERE clause plus bind parameters by the storage layer. Filters
//! that are absent or blank contribute nothing to the SQL.

use rusqlite::ToSql;

use crate::{Error, Result};

/// Fixed page size for listings
pub const PER_PAGE: i64 = 10;

/// Filter on the visited flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStatus {
    Visited,
    NotVisited,
}

impl std::str::FromStr for VisitStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "visited" => Ok(VisitStatus::Visited),
            "not_visited" => Ok(VisitStatus::NotVisited),
            _ => Err(Error::Validation(format!("Unknown status: {s}"))),
        }
    }
}

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first, by descending id
    #[default]
    Newest,
    /// High before Medium before Low, ties broken by name
    Priority,
}

impl SortOrder {
    /// Map a raw `sort` parameter; anything unrecognized falls back to newest
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("priority") => SortOrder::Priority,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Newest => "id DESC",
            SortOrder::Priority => {
                "CASE priority WHEN 'High' THEN 1 WHEN 'Medium' THEN 2 ELSE 3 END, name ASC"
            }
        }
    }
}

/// Optional narrowing criteria for a listing
#[derive(Debug, Clone, Default)]
pub struct PlaceFilter {
    pub continent: Option<String>,
    pub category: Option<String>,
    pub status: Option<VisitStatus>,
    pub search: Option<String>,
}

impl PlaceFilter {
    /// Build a filter from raw request parameters. Blank values and
    /// unrecognized status strings are treated as "no filter".
    pub fn from_params(
        continent: Option<&str>,
        category: Option<&str>,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        Self {
            continent: non_blank(continent),
            category: non_blank(category),
            status: status.and_then(|s| s.trim().parse().ok()),
            search: non_blank(search),
        }
    }

    /// Render the filter as a WHERE clause (including the leading
    /// ` WHERE `, or empty when no filter is active) plus its bind
    /// parameters in positional order
    pub fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(continent) = &self.continent {
            clauses.push("continent = ?");
            params.push(Box::new(continent.clone()));
        }
        if let Some(category) = &self.category {
            clauses.push("category = ?");
            params.push(Box::new(category.clone()));
        }
        match self.status {
            Some(VisitStatus::Visited) => clauses.push("visited = 1"),
            Some(VisitStatus::NotVisited) => clauses.push("visited = 0"),
            None => {}
        }
        if let Some(search) = &self.search {
            clauses.push(r"(LOWER(name) LIKE ? ESCAPE '\' OR LOWER(country) LIKE ? ESCAPE '\')");
            let pattern = like_pattern(search);
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }

        let sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        (sql, params)
    }
}

/// A full listing request: filter, order and page number
#[derive(Debug, Clone, Default)]
pub struct PlaceQuery {
    pub filter: PlaceFilter,
    pub sort: SortOrder,
    pub page: i64,
}

impl PlaceQuery {
    /// Row offset of the requested page. Saturating, so a page number
    /// near `i64::MAX` lands past the data instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(PER_PAGE).max(0)
    }
}

/// Coerce a raw page parameter to a 1-based page number. Absent,
/// non-numeric and non-positive values all become page 1.
pub fn page_from_param(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(page) if page >= 1 => page,
        _ => 1,
    }
}

/// Case-insensitive substring pattern for LIKE, with `%`, `_` and the
/// escape character itself escaped so user input matches literally
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
