use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display};

/// Broad grouping of an activity
///
/// The catalog is free to introduce new categories; anything outside the known
/// set is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Wellness,
    Entertainment,
    Outdoor,
    Creative,
    Social,
    Fitness,
    Learning,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Wellness => "Wellness",
            Category::Entertainment => "Entertainment",
            Category::Outdoor => "Outdoor",
            Category::Creative => "Creative",
            Category::Social => "Social",
            Category::Fitness => "Fitness",
            Category::Learning => "Learning",
            Category::Other(name) => name,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "wellness" => Category::Wellness,
            "entertainment" => Category::Entertainment,
            "outdoor" => Category::Outdoor,
            "creative" => Category::Creative,
            "social" => Category::Social,
            "fitness" => Category::Fitness,
            "learning" => Category::Learning,
            _ => Category::Other(value.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry of the activity catalog
///
/// Activities are only ever built by the catalog loader, which guarantees a
/// non-empty description and a positive duration.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Activity {
    /// 1-based position in the catalog
    pub id: usize,
    pub description: String,
    pub category: Category,
    /// Lower-cased, deduplicated tags
    pub tags: BTreeSet<String>,
    /// Lower-cased mood label this activity suits
    pub mood: String,
    pub duration_minutes: u32,
}

impl Activity {
    /// Splits a delimited tag list into normalized tags, dropping blanks
    pub fn parse_tags(raw: &str) -> BTreeSet<String> {
        raw.split([',', ';', '|'])
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}
