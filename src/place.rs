//! Place types for the bucket list

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Continent a place belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    Asia,
    Europe,
    Africa,
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    Australia,
    Antarctica,
}

impl Continent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Africa => "Africa",
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Australia => "Australia",
            Continent::Antarctica => "Antarctica",
        }
    }

    /// All continents, in the order the forms list them
    pub fn all() -> &'static [Continent] {
        &[
            Continent::Asia,
            Continent::Europe,
            Continent::Africa,
            Continent::NorthAmerica,
            Continent::SouthAmerica,
            Continent::Australia,
            Continent::Antarctica,
        ]
    }
}

impl std::str::FromStr for Continent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "asia" => Ok(Continent::Asia),
            "europe" => Ok(Continent::Europe),
            "africa" => Ok(Continent::Africa),
            "northamerica" => Ok(Continent::NorthAmerica),
            "southamerica" => Ok(Continent::SouthAmerica),
            "australia" => Ok(Continent::Australia),
            "antarctica" => Ok(Continent::Antarctica),
            _ => Err(Error::Validation(format!("Unknown continent: {s}"))),
        }
    }
}

impl std::fmt::Display for Continent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Beach,
    Mountain,
    City,
    Desert,
    Nature,
    Cultural,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Beach => "Beach",
            Category::Mountain => "Mountain",
            Category::City => "City",
            Category::Desert => "Desert",
            Category::Nature => "Nature",
            Category::Cultural => "Cultural",
        }
    }

    /// All categories, in the order the forms list them
    pub fn all() -> &'static [Category] {
        &[
            Category::Beach,
            Category::Mountain,
            Category::City,
            Category::Desert,
            Category::Nature,
            Category::Cultural,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "beach" => Ok(Category::Beach),
            "mountain" => Ok(Category::Mountain),
            "city" => Ok(Category::City),
            "desert" => Ok(Category::Desert),
            "nature" => Ok(Category::Nature),
            "cultural" => Ok(Category::Cultural),
            _ => Err(Error::Validation(format!("Unknown category: {s}"))),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How urgently the place should be visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// All priorities, highest first
    pub fn all() -> &'static [Priority] {
        &[Priority::High, Priority::Medium, Priority::Low]
    }

    /// Sort weight for priority ordering; lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(Error::Validation(format!("Unknown priority: {s}"))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowercase and strip separators so "North America", "north-america"
/// and "NorthAmerica" all parse to the same variant
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_lowercase()
}

/// A stored bucket-list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub continent: Continent,
    pub category: Category,
    pub description: String,
    pub priority: Priority,
    pub visited: bool,
    pub visited_date: Option<NaiveDate>,
}

/// A validated place ready to be inserted or to replace an existing row
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub name: String,
    pub country: String,
    pub continent: Continent,
    pub category: Category,
    pub description: String,
    pub priority: Priority,
}

/// Raw form input from the web UI or CLI, before validation.
///
/// Every field defaults to empty so an omitted field fails validation
/// instead of rejecting the whole request at the deserializer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
}

impl PlaceForm {
    /// Check every field is present and the fixed-choice fields name a
    /// known value, trimming surrounding whitespace along the way
    pub fn validate(&self) -> Result<NewPlace> {
        let name = required(&self.name, "Name")?;
        let country = required(&self.country, "Country")?;
        let continent: Continent = required(&self.continent, "Continent")?.parse()?;
        let category: Category = required(&self.category, "Category")?.parse()?;
        let description = required(&self.description, "Description")?;
        let priority: Priority = required(&self.priority, "Priority")?.parse()?;

        Ok(NewPlace {
            name,
            country,
            continent,
            category,
            description,
            priority,
        })
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
