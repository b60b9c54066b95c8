pub mod movie_detail;
pub mod runtime;
pub mod search_result;
pub mod watched_entry;

pub use movie_detail::MovieDetail;
pub use runtime::parse_runtime_minutes;
pub use search_result::SearchResultItem;
pub use watched_entry::WatchedEntry;
