use popcorn_models::{MovieDetail, SearchResultItem};
use popcorn_sources::SourceError;
use crate::cancel::CancellationToken;

/// User intents handled by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetQuery(String),
    /// Focus the search input and clear it
    FocusSearch,
    /// Focus the search input keeping its text
    ResumeSearch,
    /// Move focus away from the search input
    BlurSearch,
    Select(String),
    Close,
    /// Draft rating for the open movie (1-10)
    SetUserRating(u8),
    /// Add the open movie with the draft rating
    AddWatched,
    RemoveWatched(String),
}

/// Everything the event loop reacts to.
///
/// Fetch completions carry the token they were issued with; the owning
/// source ignores them once that token has been cancelled.
#[derive(Debug)]
pub enum AppEvent {
    Action(Action),
    SearchCompleted {
        token: CancellationToken,
        query: String,
        result: Result<Vec<SearchResultItem>, SourceError>,
    },
    DetailCompleted {
        token: CancellationToken,
        imdb_id: String,
        result: Result<MovieDetail, SourceError>,
    },
}

impl From<Action> for AppEvent {
    fn from(action: Action) -> Self {
        AppEvent::Action(action)
    }
}
