use popcorn_models::SearchResultItem;
use popcorn_sources::{MovieCatalog, SourceError};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use crate::cancel::{CancellationSource, CancellationToken};
use crate::events::AppEvent;

/// Queries shorter than this never reach the catalog
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Title search driven by a live query string.
///
/// `Idle -> Loading -> Success | Failure`, re-entering `Loading` on every
/// query change. Only the most recent query's outcome is ever applied.
pub struct SearchSource {
    catalog: Arc<dyn MovieCatalog>,
    events: UnboundedSender<AppEvent>,
    tokens: CancellationSource,
    in_flight: Option<JoinHandle<()>>,
    state: SearchState,
}

impl SearchSource {
    pub fn new(catalog: Arc<dyn MovieCatalog>, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            catalog,
            events,
            tokens: CancellationSource::new(),
            in_flight: None,
            state: SearchState::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Must be called from within a tokio runtime
    pub fn set_query(&mut self, query: &str) {
        self.cancel_in_flight();
        self.state.query = query.to_string();
        self.state.error = None;
        self.state.results.clear();

        if query.chars().count() < MIN_QUERY_LEN {
            self.state.is_loading = false;
            return;
        }

        self.state.is_loading = true;
        let token = self.tokens.issue();
        let catalog = self.catalog.clone();
        let events = self.events.clone();
        let query = query.to_string();

        debug!(query = %query, "Starting search");
        self.in_flight = Some(tokio::spawn(async move {
            let result = catalog.search(&query).await;
            if token.is_cancelled() {
                return;
            }
            // The receiver is gone only during shutdown
            let _ = events.send(AppEvent::SearchCompleted { token, query, result });
        }));
    }

    /// Apply a finished search. Returns false if it was stale and discarded.
    pub fn complete(
        &mut self,
        token: &CancellationToken,
        query: &str,
        result: Result<Vec<SearchResultItem>, SourceError>,
    ) -> bool {
        if token.is_cancelled() {
            debug!(query = %query, "Discarding superseded search");
            return false;
        }

        self.state.is_loading = false;
        self.in_flight = None;
        match result {
            Ok(items) => {
                info!(query = %query, results = items.len(), "Search finished");
                self.state.results = items;
                self.state.error = None;
            }
            Err(e) => {
                if e.is_transport() {
                    warn!(query = %query, error = ?e, "Search transport failure");
                } else {
                    debug!(query = %query, error = %e, "Search rejected by catalog");
                }
                self.state.results.clear();
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    fn cancel_in_flight(&mut self) {
        self.tokens.cancel();
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchSource {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
