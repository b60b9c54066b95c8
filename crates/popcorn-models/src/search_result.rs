use serde::{Deserialize, Serialize};

/// A single hit from a catalog title search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String, // Kept as text: series come back as "2005–2008"
    #[serde(rename = "Poster", default)]
    pub poster: String, // URL or "N/A"
}

impl SearchResultItem {
    pub fn has_poster(&self) -> bool {
        !self.poster.is_empty() && self.poster != "N/A"
    }
}
