use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use popcorn_sources::{MovieCatalog, SourceError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use crate::events::AppEvent;
use crate::title::WindowTitle;

enum Reply<T> {
    Ready(Result<T, SourceError>),
    Gated(oneshot::Receiver<Result<T, SourceError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, SourceError> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(rx) => match rx.await {
                Ok(result) => result,
                Err(_) => Err(SourceError::api(Some("gate dropped".to_string()))),
            },
        }
    }
}

/// Catalog whose replies are scripted per query / identifier.
///
/// Each scripted reply is consumed by one call. Unscripted calls fail with
/// the catalog's "not found" message.
#[derive(Default)]
pub struct MockCatalog {
    searches: Mutex<HashMap<String, Reply<Vec<SearchResultItem>>>>,
    details: Mutex<HashMap<String, Reply<MovieDetail>>>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_search(&self, query: &str, result: Result<Vec<SearchResultItem>, SourceError>) {
        self.searches.lock().unwrap().insert(query.to_string(), Reply::Ready(result));
    }

    /// The search for `query` blocks until the returned sender fires
    pub fn gate_search(&self, query: &str) -> oneshot::Sender<Result<Vec<SearchResultItem>, SourceError>> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().unwrap().insert(query.to_string(), Reply::Gated(rx));
        tx
    }

    pub fn reply_detail(&self, imdb_id: &str, result: Result<MovieDetail, SourceError>) {
        self.details.lock().unwrap().insert(imdb_id.to_string(), Reply::Ready(result));
    }

    pub fn gate_detail(&self, imdb_id: &str) -> oneshot::Sender<Result<MovieDetail, SourceError>> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().unwrap().insert(imdb_id.to_string(), Reply::Gated(rx));
        tx
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    fn catalog_name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.searches.lock().unwrap().remove(query);
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(SourceError::api(None)),
        }
    }

    async fn movie_details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.details.lock().unwrap().remove(imdb_id);
        match reply {
            Some(reply) => reply.resolve().await,
            None => Err(SourceError::api(Some("Incorrect IMDb ID.".to_string()))),
        }
    }
}

/// Records every title it is asked to show
#[derive(Default)]
pub struct RecordingTitle {
    titles: Mutex<Vec<String>>,
}

impl RecordingTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.titles.lock().unwrap().last().cloned()
    }
}

impl WindowTitle for RecordingTitle {
    fn set_window_title(&self, title: &str) {
        self.titles.lock().unwrap().push(title.to_string());
    }
}

pub fn items(ids: &[&str]) -> Vec<SearchResultItem> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| SearchResultItem {
            imdb_id: id.to_string(),
            title: format!("Movie {}", i + 1),
            year: "2005".to_string(),
            poster: "N/A".to_string(),
        })
        .collect()
}

pub fn detail(imdb_id: &str, title: &str, runtime: &str, imdb_rating: &str) -> MovieDetail {
    MovieDetail {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "2005".to_string(),
        runtime: runtime.to_string(),
        imdb_rating: imdb_rating.to_string(),
        ..MovieDetail::default()
    }
}

/// Wait for the next event, failing the test instead of hanging
pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}
