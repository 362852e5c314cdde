//! CSV export of the full bucket list

use crate::place::Place;

/// Header row of the export, one column per stored field
pub const CSV_HEADER: &str =
    "id,name,country,continent,category,description,priority,visited,visited_date";

/// Render places as CSV, header first. Fields containing commas, quotes
/// or line breaks are quoted, with embedded quotes doubled.
pub fn to_csv(places: &[Place]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for place in places {
        out.push_str(&record(place));
        out.push('\n');
    }
    out
}

fn record(place: &Place) -> String {
    [
        place.id.to_string(),
        field(&place.name),
        field(&place.country),
        field(place.continent.as_str()),
        field(place.category.as_str()),
        field(&place.description),
        field(place.priority.as_str()),
        place.visited.to_string(),
        place
            .visited_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
    ]
    .join(",")
}

fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
