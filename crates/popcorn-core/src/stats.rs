use popcorn_models::WatchedEntry;
use serde::Serialize;

/// Arithmetic mean; an empty slice averages to 0
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Aggregates over the watched list. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WatchedSummary {
    pub count: usize,
    /// Rounded to one decimal
    pub avg_imdb_rating: f64,
    /// Rounded to one decimal
    pub avg_user_rating: f64,
    /// Whole minutes
    pub avg_runtime: u32,
}

impl WatchedSummary {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        let imdb: Vec<f64> = entries.iter().map(|e| e.imdb_rating).collect();
        let user: Vec<f64> = entries.iter().map(|e| f64::from(e.user_rating)).collect();
        let runtime: Vec<f64> = entries.iter().map(|e| f64::from(e.runtime)).collect();

        Self {
            count: entries.len(),
            avg_imdb_rating: round_to(average(&imdb), 1),
            avg_user_rating: round_to(average(&user), 1),
            avg_runtime: average(&runtime).round() as u32,
        }
    }

    /// Ratings are shown with two decimals
    pub fn imdb_rating_display(&self) -> String {
        format!("{:.2}", self.avg_imdb_rating)
    }

    pub fn user_rating_display(&self) -> String {
        format!("{:.2}", self.avg_user_rating)
    }

    pub fn runtime_display(&self) -> String {
        format!("{} min", self.avg_runtime)
    }
}
