use popcorn_config::DisplayConfig;
use popcorn_models::MovieDetail;
use popcorn_sources::{MovieCatalog, SourceError};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use crate::cancel::{CancellationSource, CancellationToken};
use crate::events::AppEvent;
use crate::title::WindowTitle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub selected: Option<String>,
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Full-record fetch for the selected movie.
///
/// While a loaded movie is shown the window title names it; the default
/// title comes back when the selection changes or the view closes.
pub struct DetailSource {
    catalog: Arc<dyn MovieCatalog>,
    events: UnboundedSender<AppEvent>,
    title: Arc<dyn WindowTitle>,
    display: DisplayConfig,
    tokens: CancellationSource,
    in_flight: Option<JoinHandle<()>>,
    title_applied: bool,
    state: DetailState,
}

impl DetailSource {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        events: UnboundedSender<AppEvent>,
        title: Arc<dyn WindowTitle>,
        display: DisplayConfig,
    ) -> Self {
        Self {
            catalog,
            events,
            title,
            display,
            tokens: CancellationSource::new(),
            in_flight: None,
            title_applied: false,
            state: DetailState::default(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.selected.is_some()
    }

    /// Must be called from within a tokio runtime
    pub fn select(&mut self, imdb_id: &str) {
        self.cancel_in_flight();
        self.restore_title();

        self.state = DetailState {
            selected: Some(imdb_id.to_string()),
            detail: None,
            is_loading: true,
            error: None,
        };

        let token = self.tokens.issue();
        let catalog = self.catalog.clone();
        let events = self.events.clone();
        let imdb_id = imdb_id.to_string();

        debug!(imdb_id = %imdb_id, "Fetching movie details");
        self.in_flight = Some(tokio::spawn(async move {
            let result = catalog.movie_details(&imdb_id).await;
            if token.is_cancelled() {
                return;
            }
            let _ = events.send(AppEvent::DetailCompleted { token, imdb_id, result });
        }));
    }

    /// Apply a finished fetch. Returns false if it was stale and discarded.
    pub fn complete(
        &mut self,
        token: &CancellationToken,
        imdb_id: &str,
        result: Result<MovieDetail, SourceError>,
    ) -> bool {
        if token.is_cancelled() || self.state.selected.as_deref() != Some(imdb_id) {
            debug!(imdb_id = %imdb_id, "Discarding superseded detail fetch");
            return false;
        }

        self.state.is_loading = false;
        self.in_flight = None;
        match result {
            Ok(detail) => {
                info!(imdb_id = %imdb_id, title = %detail.title, "Loaded movie details");
                if !detail.title.is_empty() {
                    self.title.set_window_title(&self.display.detail_title(&detail.title));
                    self.title_applied = true;
                }
                self.state.detail = Some(detail);
                self.state.error = None;
            }
            Err(e) => {
                warn!(imdb_id = %imdb_id, error = ?e, "Failed to load movie details");
                self.state.detail = None;
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn close(&mut self) {
        self.cancel_in_flight();
        self.restore_title();
        self.state = DetailState::default();
    }

    fn restore_title(&mut self) {
        if self.title_applied {
            self.title.set_window_title(&self.display.default_title);
            self.title_applied = false;
        }
    }

    fn cancel_in_flight(&mut self) {
        self.tokens.cancel();
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for DetailSource {
    fn drop(&mut self) {
        self.cancel_in_flight();
        self.restore_title();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{detail, next_event, MockCatalog, RecordingTitle};
    use tokio::sync::mpsc;

    fn apply(source: &mut DetailSource, event: AppEvent) -> bool {
        match event {
            AppEvent::DetailCompleted { token, imdb_id, result } => source.complete(&token, &imdb_id, result),
            other => panic!("unexpected event {:?}", other),
        }
    }

    fn setup() -> (
        Arc<MockCatalog>,
        Arc<RecordingTitle>,
        DetailSource,
        mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let catalog = Arc::new(MockCatalog::new());
        let title = Arc::new(RecordingTitle::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let source = DetailSource::new(catalog.clone(), tx, title.clone(), DisplayConfig::default());
        (catalog, title, source, rx)
    }

    #[tokio::test]
    async fn test_select_loads_detail_and_sets_title() {
        let (catalog, title, mut source, mut rx) = setup();
        catalog.reply_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins", "140 min", "8.2")));

        source.select("tt0372784");
        assert!(source.state().is_loading);
        assert!(source.is_open());

        let event = next_event(&mut rx).await;
        assert!(apply(&mut source, event));
        assert!(!source.state().is_loading);
        assert_eq!(source.state().detail.as_ref().unwrap().title, "Batman Begins");
        assert_eq!(title.current().as_deref(), Some("Movie:- Batman Begins"));
    }

    #[tokio::test]
    async fn test_close_restores_default_title() {
        let (catalog, title, mut source, mut rx) = setup();
        catalog.reply_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins", "140 min", "8.2")));

        source.select("tt0372784");
        let event = next_event(&mut rx).await;
        apply(&mut source, event);

        source.close();
        assert!(!source.is_open());
        assert_eq!(source.state(), &DetailState::default());
        assert_eq!(title.history(), vec!["Movie:- Batman Begins", "usePopcorn"]);
    }

    #[tokio::test]
    async fn test_changing_selection_discards_prior_fetch() {
        let (catalog, title, mut source, mut rx) = setup();
        let slow = catalog.gate_detail("tt0000001");
        catalog.reply_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins", "140 min", "8.2")));

        source.select("tt0000001");
        tokio::task::yield_now().await;
        source.select("tt0372784");

        let event = next_event(&mut rx).await;
        assert!(apply(&mut source, event));

        let _ = slow.send(Ok(detail("tt0000001", "Stale", "90 min", "5.0")));
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(source.state().detail.as_ref().unwrap().imdb_id, "tt0372784");
        assert_eq!(title.history(), vec!["Movie:- Batman Begins"]);
    }

    #[tokio::test]
    async fn test_changing_selection_restores_title_first() {
        let (catalog, title, mut source, mut rx) = setup();
        catalog.reply_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins", "140 min", "8.2")));
        let _pending = catalog.gate_detail("tt1877830");

        source.select("tt0372784");
        let event = next_event(&mut rx).await;
        apply(&mut source, event);

        source.select("tt1877830");
        assert!(source.state().detail.is_none());
        assert!(source.state().is_loading);
        assert_eq!(title.current().as_deref(), Some("usePopcorn"));
    }

    #[tokio::test]
    async fn test_completion_after_close_is_ignored() {
        let (catalog, title, mut source, mut rx) = setup();
        catalog.reply_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins", "140 min", "8.2")));

        source.select("tt0372784");
        let stale = next_event(&mut rx).await;
        source.close();

        assert!(!apply(&mut source, stale));
        assert!(!source.is_open());
        assert!(title.history().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_surfaces_error() {
        let (_catalog, title, mut source, mut rx) = setup();

        source.select("tt0000000");
        let event = next_event(&mut rx).await;
        apply(&mut source, event);

        assert!(!source.state().is_loading);
        assert_eq!(source.state().error.as_deref(), Some("Incorrect IMDb ID."));
        assert!(title.history().is_empty());
    }

    #[tokio::test]
    async fn test_untitled_detail_leaves_title_alone() {
        let (catalog, title, mut source, mut rx) = setup();
        catalog.reply_detail("tt0000002", Ok(detail("tt0000002", "", "N/A", "N/A")));

        source.select("tt0000002");
        let event = next_event(&mut rx).await;
        apply(&mut source, event);
        source.close();

        assert!(title.history().is_empty());
    }
}
