use serde::{Deserialize, Serialize};

/// Full catalog record for one movie.
///
/// Field names follow the catalog's wire format. Anything the catalog leaves
/// out deserializes to an empty string rather than failing the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MovieDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Poster")]
    pub poster: String,
    #[serde(rename = "Runtime")]
    pub runtime: String, // Free text, e.g. "142 min"
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String, // Numeric string or "N/A"
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Genre")]
    pub genre: String,
}

impl MovieDetail {
    /// External rating as a number; unrated titles count as 0.
    pub fn imdb_rating_value(&self) -> f64 {
        self.imdb_rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    pub fn runtime_minutes(&self) -> u32 {
        crate::runtime::parse_runtime_minutes(&self.runtime)
    }
}
