use popcorn_models::{MovieDetail, SearchResultItem, WatchedEntry};
use crate::detail::DetailState;
use crate::search::{SearchState, MIN_QUERY_LEN};
use crate::stats::WatchedSummary;
use crate::watched::WatchedList;

pub const NO_MOVIES_FOUND: &str = "No movies found.";

/// Everything a renderer needs for one frame. Rebuilt after every event.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub query: String,
    pub search_focused: bool,
    pub result_count: usize,
    pub results: ResultsPanel,
    pub side: SidePanel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsPanel {
    /// Nothing searched yet
    Idle,
    Loading,
    Error(String),
    List(Vec<SearchResultItem>),
    NoMoviesFound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SidePanel {
    Detail(DetailPanel),
    Watched {
        summary: WatchedSummary,
        entries: Vec<WatchedEntry>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPanel {
    Loading {
        imdb_id: String,
    },
    Error {
        imdb_id: String,
        message: String,
    },
    Loaded {
        detail: MovieDetail,
        /// Rating already on the watched list, if any
        watched_rating: Option<u8>,
        draft_rating: Option<u8>,
    },
}

impl DetailPanel {
    /// Whether the add control should be offered
    pub fn can_add(&self) -> bool {
        matches!(
            self,
            DetailPanel::Loaded { watched_rating: None, draft_rating: Some(r), .. } if *r > 0
        )
    }
}

impl ResultsPanel {
    pub fn compose(search: &SearchState) -> Self {
        if search.is_loading {
            return ResultsPanel::Loading;
        }
        if let Some(error) = &search.error {
            return ResultsPanel::Error(error.clone());
        }
        if !search.results.is_empty() {
            return ResultsPanel::List(search.results.clone());
        }
        if search.query.chars().count() >= MIN_QUERY_LEN {
            return ResultsPanel::NoMoviesFound;
        }
        ResultsPanel::Idle
    }

    pub fn items(&self) -> &[SearchResultItem] {
        match self {
            ResultsPanel::List(items) => items,
            _ => &[],
        }
    }
}

impl SidePanel {
    pub fn compose(detail: &DetailState, watched: &WatchedList, draft_rating: Option<u8>) -> Self {
        let Some(imdb_id) = detail.selected.clone() else {
            return SidePanel::Watched {
                summary: WatchedSummary::from_entries(watched.entries()),
                entries: watched.entries().to_vec(),
            };
        };

        let panel = if detail.is_loading {
            DetailPanel::Loading { imdb_id }
        } else if let Some(message) = &detail.error {
            DetailPanel::Error {
                imdb_id,
                message: message.clone(),
            }
        } else if let Some(movie) = &detail.detail {
            DetailPanel::Loaded {
                detail: movie.clone(),
                watched_rating: watched.get(&imdb_id).map(|e| e.user_rating),
                draft_rating,
            }
        } else {
            DetailPanel::Loading { imdb_id }
        };
        SidePanel::Detail(panel)
    }
}
