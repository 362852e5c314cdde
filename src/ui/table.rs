use tabled::{Table, Tabled, settings::Style};

use crate::place::Place;

#[derive(Tabled)]
struct PlaceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Continent")]
    continent: &'static str,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Visited")]
    visited: String,
}

impl From<&Place> for PlaceRow {
    fn from(place: &Place) -> Self {
        let visited = match place.visited_date {
            Some(date) => format!("yes ({date})"),
            None if place.visited => "yes".to_string(),
            None => "no".to_string(),
        };
        Self {
            id: place.id,
            name: place.name.clone(),
            country: place.country.clone(),
            continent: place.continent.as_str(),
            category: place.category.as_str(),
            priority: place.priority.as_str(),
            visited,
        }
    }
}

/// Render one listing page as a rounded table
pub fn places_table(places: &[Place]) -> String {
    if places.is_empty() {
        return String::new();
    }
    let rows: Vec<PlaceRow> = places.iter().map(PlaceRow::from).collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(String, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}
