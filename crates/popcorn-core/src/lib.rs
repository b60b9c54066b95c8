pub mod cancel;
pub mod controller;
pub mod detail;
pub mod events;
pub mod keys;
pub mod search;
pub mod stats;
pub mod storage;
pub mod title;
pub mod view;
pub mod watched;

#[cfg(test)]
pub(crate) mod test_support;

pub use cancel::{CancellationSource, CancellationToken};
pub use controller::Controller;
pub use detail::{DetailSource, DetailState};
pub use events::{Action, AppEvent};
pub use keys::{KeyListener, KeySubscription};
pub use search::{SearchSource, SearchState, MIN_QUERY_LEN};
pub use stats::{average, WatchedSummary};
pub use storage::{FileSlotStore, MemorySlotStore, PersistedSlot, SlotStore, StorageError};
pub use title::WindowTitle;
pub use view::{DetailPanel, ResultsPanel, SidePanel, ViewModel, NO_MOVIES_FOUND};
pub use watched::WatchedList;
