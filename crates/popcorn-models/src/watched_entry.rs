use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::movie_detail::MovieDetail;

/// A rated movie on the user's watched list.
///
/// Serialized names match the stored slot format so existing lists load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
    #[serde(rename = "imdbRating", default, deserialize_with = "null_as_default")]
    pub imdb_rating: f64,
    #[serde(rename = "userRating")]
    pub user_rating: u8, // 1-10, zero is never stored
    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime: u32, // Minutes
    #[serde(rename = "addedAt", default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

/// Lists written by older builds store unrated titles and unknown runtimes as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WatchedEntry {
    /// Build an entry from a loaded detail and the user's rating.
    ///
    /// Returns `None` for a zero rating; only positive ratings are recorded.
    pub fn from_detail(detail: &MovieDetail, user_rating: u8) -> Option<Self> {
        if user_rating == 0 {
            return None;
        }

        Some(Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            imdb_rating: detail.imdb_rating_value(),
            user_rating,
            runtime: detail.runtime_minutes(),
            added_at: Some(Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batman_begins() -> MovieDetail {
        MovieDetail {
            imdb_id: "tt0372784".to_string(),
            title: "Batman Begins".to_string(),
            year: "2005".to_string(),
            runtime: "140 min".to_string(),
            imdb_rating: "8.2".to_string(),
            ..MovieDetail::default()
        }
    }

    #[test]
    fn test_from_detail() {
        let entry = WatchedEntry::from_detail(&batman_begins(), 8).unwrap();
        assert_eq!(entry.imdb_id, "tt0372784");
        assert_eq!(entry.runtime, 140);
        assert_eq!(entry.user_rating, 8);
        assert_eq!(entry.imdb_rating, 8.2);
        assert!(entry.added_at.is_some());
    }

    #[test]
    fn test_zero_rating_is_rejected() {
        assert!(WatchedEntry::from_detail(&batman_begins(), 0).is_none());
    }

    #[test]
    fn test_reads_stored_slot_format() {
        let json = r#"{"imdbID":"tt0372784","title":"Batman Begins","year":"2005","poster":"N/A","imdbRating":8.2,"userRating":8,"runtime":140}"#;
        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.user_rating, 8);
        assert_eq!(entry.runtime, 140);
        assert_eq!(entry.added_at, None);

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["imdbID"], "tt0372784");
        assert!(back.get("addedAt").is_none());
    }

    #[test]
    fn test_null_rating_and_runtime_read_as_zero() {
        let json = r#"{"imdbID":"tt9","title":"Indie","year":"2019","poster":"N/A","imdbRating":null,"userRating":7,"runtime":null}"#;
        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.imdb_rating, 0.0);
        assert_eq!(entry.runtime, 0);
        assert_eq!(entry.user_rating, 7);
    }
}
