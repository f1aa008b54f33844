//! Data models for Character Explorer

use serde::{Deserialize, Serialize};

/// UI Tab selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Characters,
    Favorites,
    Console,
}

/// Named place reference (origin or last known location)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A character record as returned by the API (and persisted in favorites)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub origin: Place,
    #[serde(default)]
    pub location: Place,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

impl Character {
    /// Status with the colored marker used on cards
    pub fn status_badge(&self) -> String {
        match self.status.as_str() {
            "Alive" => "🟢 Alive".to_string(),
            "Dead" => "🔴 Dead".to_string(),
            "unknown" => "❔ Unknown".to_string(),
            other => other.to_string(),
        }
    }

    /// Creation date as YYYY-MM-DD, or the raw value if it doesn't parse
    pub fn created_display(&self) -> String {
        match chrono::DateTime::parse_from_rfc3339(&self.created) {
            Ok(dt) => dt.format("%Y-%m-%d").to_string(),
            Err(_) => self.created.clone(),
        }
    }
}

/// Human-readable label for an episode URL.
///
/// `https://rickandmortyapi.com/api/episode/28` becomes `Episode 28`.
pub fn episode_label(url: &str) -> String {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let id = segments.next().unwrap_or_default();
    let resource = segments.next().unwrap_or_default();

    let mut chars = resource.chars();
    match chars.next() {
        Some(first) if !id.is_empty() => {
            format!("{}{} {}", first.to_uppercase(), chars.as_str(), id)
        }
        _ => url.to_string(),
    }
}

/// Pagination metadata of a collection response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// `results` is either a single object or an array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Results {
    Many(Vec<Character>),
    One(Box<Character>),
}

impl Results {
    pub fn into_vec(self) -> Vec<Character> {
        match self {
            Results::Many(list) => list,
            Results::One(character) => vec![*character],
        }
    }
}

/// Collection endpoint response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub info: PageInfo,
    pub results: Results,
}

/// One entry of the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub is_selected: bool,
}

/// Page buttons numbered 1..=count, optionally with one of them selected
pub fn page_list(count: u32, selected: Option<u32>) -> Vec<Page> {
    (1..=count)
        .map(|number| Page {
            number,
            is_selected: selected == Some(number),
        })
        .collect()
}

/// Categorical filters, in query order: status, gender, species
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub status: Option<String>,
    pub gender: Option<String>,
    pub species: Option<String>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        [&self.status, &self.gender, &self.species]
            .iter()
            .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

// Filter choices offered in the UI: (label, query value)
pub const STATUS_OPTIONS: &[(&str, &str)] = &[
    ("Alive", "alive"),
    ("Dead", "dead"),
    ("Unknown", "unknown"),
];

pub const GENDER_OPTIONS: &[(&str, &str)] = &[
    ("Female", "female"),
    ("Male", "male"),
    ("Genderless", "genderless"),
    ("Unknown", "unknown"),
];

pub const SPECIES_OPTIONS: &[(&str, &str)] = &[
    ("Human", "human"),
    ("Alien", "alien"),
    ("Humanoid", "humanoid"),
    ("Poopybutthole", "poopybutthole"),
    ("Mythological Creature", "mythological creature"),
    ("Animal", "animal"),
    ("Robot", "robot"),
    ("Cronenberg", "cronenberg"),
    ("Disease", "disease"),
    ("Unknown", "unknown"),
];

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
