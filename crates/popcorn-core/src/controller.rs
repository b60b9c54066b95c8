use popcorn_config::Config;
use popcorn_models::WatchedEntry;
use popcorn_sources::MovieCatalog;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use crate::detail::DetailSource;
use crate::events::{Action, AppEvent};
use crate::keys::{KeyListener, KeySubscription};
use crate::search::SearchSource;
use crate::storage::SlotStore;
use crate::title::WindowTitle;
use crate::view::{ResultsPanel, SidePanel, ViewModel};
use crate::watched::WatchedList;

/// Composition root of the interactive app.
///
/// Owns the query, the selection and the watched list, and mediates
/// between user actions and the two data sources. All state changes
/// happen in [`Controller::handle_event`], called from a single event loop.
pub struct Controller {
    events: UnboundedSender<AppEvent>,
    keys: KeyListener,
    search: SearchSource,
    detail: DetailSource,
    watched: WatchedList,
    query: String,
    search_focused: bool,
    draft_rating: Option<u8>,
    _enter: KeySubscription,
    escape: Option<KeySubscription>,
}

impl Controller {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        store: Arc<dyn SlotStore>,
        keys: KeyListener,
        title: Arc<dyn WindowTitle>,
        config: &Config,
    ) -> (Self, UnboundedReceiver<AppEvent>) {
        let (events, rx) = mpsc::unbounded_channel();

        let enter_tx = events.clone();
        let enter = keys.on_key("Enter", move || {
            let _ = enter_tx.send(Action::FocusSearch.into());
        });

        let controller = Self {
            search: SearchSource::new(catalog.clone(), events.clone()),
            detail: DetailSource::new(catalog, events.clone(), title, config.display.clone()),
            watched: WatchedList::load(store, &config.storage.watched_slot),
            events,
            keys,
            query: String::new(),
            search_focused: true,
            draft_rating: None,
            _enter: enter,
            escape: None,
        };
        (controller, rx)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.detail.state().selected.as_deref()
    }

    pub fn watched(&self) -> &WatchedList {
        &self.watched
    }

    /// Returns whether the event changed anything worth redrawing
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Action(action) => {
                self.handle_action(action);
                true
            }
            AppEvent::SearchCompleted { token, query, result } => self.search.complete(&token, &query, result),
            AppEvent::DetailCompleted { token, imdb_id, result } => self.detail.complete(&token, &imdb_id, result),
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        debug!(?action, "Handling action");
        match action {
            Action::SetQuery(query) => self.set_query(query),
            Action::FocusSearch => {
                self.search_focused = true;
                self.set_query(String::new());
            }
            Action::ResumeSearch => self.search_focused = true,
            Action::BlurSearch => self.search_focused = false,
            Action::Select(imdb_id) => self.select(&imdb_id),
            Action::Close => self.close(),
            Action::SetUserRating(rating) => self.set_user_rating(rating),
            Action::AddWatched => {
                self.add_open_movie();
            }
            Action::RemoveWatched(imdb_id) => {
                self.remove_watched(&imdb_id);
            }
        }
    }

    pub fn set_query(&mut self, query: String) {
        self.search.set_query(&query);
        self.query = query;
    }

    pub fn select(&mut self, imdb_id: &str) {
        self.draft_rating = None;
        self.detail.select(imdb_id);

        if self.escape.is_none() {
            let tx = self.events.clone();
            self.escape = Some(self.keys.on_key("Escape", move || {
                let _ = tx.send(Action::Close.into());
            }));
        }
    }

    /// Close the detail view; no-op when none is open
    pub fn close(&mut self) {
        if !self.detail.is_open() {
            return;
        }
        self.detail.close();
        self.draft_rating = None;
        self.escape = None;
    }

    pub fn set_user_rating(&mut self, rating: u8) {
        let Some(imdb_id) = self.selected_id() else {
            return;
        };
        if self.watched.contains(imdb_id) {
            return;
        }
        self.draft_rating = match rating {
            0 => None,
            r => Some(r.min(10)),
        };
    }

    /// Append `entry` unless its identifier is already listed
    fn add_watched(&mut self, entry: WatchedEntry) -> bool {
        self.watched.add(entry)
    }

    /// Drop the entry for `imdb_id`; no-op if absent
    pub fn remove_watched(&mut self, imdb_id: &str) -> bool {
        self.watched.remove(imdb_id)
    }

    /// Record the open movie with the draft rating, then close the detail view
    fn add_open_movie(&mut self) -> bool {
        let (Some(imdb_id), Some(rating)) = (self.selected_id().map(str::to_string), self.draft_rating) else {
            return false;
        };
        let Some(detail) = self.detail.state().detail.as_ref() else {
            return false;
        };
        let Some(mut entry) = WatchedEntry::from_detail(detail, rating) else {
            return false;
        };
        entry.imdb_id = imdb_id;

        let added = self.add_watched(entry);
        if added {
            self.close();
        }
        added
    }

    pub fn view(&self) -> ViewModel {
        let search = self.search.state();
        ViewModel {
            query: self.query.clone(),
            search_focused: self.search_focused,
            result_count: search.results.len(),
            results: ResultsPanel::compose(search),
            side: SidePanel::compose(self.detail.state(), &self.watched, self.draft_rating),
        }
    }
}
