// File: mojito-core/src/services/overlay.rs

use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::store::{Action, StoreHandle};

/// Exit animation length of the search overlay; the animation itself is
/// owned by the presentation layer.
pub const SEARCH_TRANSITION: Duration = Duration::from_millis(330);

/// Search overlay and chat panel visibility.
///
/// Visibility booleans live in the application state and only change via
/// transitions. The controller additionally tracks whether the search
/// content is mounted: it mounts on open and is only torn down once the
/// presentation layer reports the exit transition finished.
pub struct OverlayController {
    store: StoreHandle,
    search_mounted: Mutex<bool>,
}

impl OverlayController {
    pub fn new(store: StoreHandle) -> Self {
        let mounted = store.with_state(|s| s.is_search_open);
        Self {
            store,
            search_mounted: Mutex::new(mounted),
        }
    }

    pub fn open_search(&self) {
        *self.search_mounted.lock() = true;
        self.store.dispatch(Action::OpenSearch);
    }

    pub fn close_search(&self) {
        self.store.dispatch(Action::CloseSearch);
    }

    pub fn is_search_open(&self) -> bool {
        self.store.with_state(|s| s.is_search_open)
    }

    /// Whether the search content is currently in the tree.
    pub fn search_mounted(&self) -> bool {
        *self.search_mounted.lock()
    }

    /// Stand-in for the exit animation when nothing renders it: wait one
    /// [`SEARCH_TRANSITION`], then report the exit as complete.
    pub async fn await_search_exit(&self) {
        tokio::time::sleep(SEARCH_TRANSITION).await;
        self.search_exit_complete();
    }

    /// Called by the presentation layer once the exit animation is done.
    /// Ignored if the overlay was reopened meanwhile.
    pub fn search_exit_complete(&self) {
        let mut mounted = self.search_mounted.lock();
        if !self.is_search_open() {
            debug!("search overlay exit finished; unmounting content");
            *mounted = false;
        }
    }

    pub fn toggle_chat(&self) {
        self.store.dispatch(Action::ToggleChat);
    }

    pub fn close_chat(&self) {
        self.store.dispatch(Action::CloseChat);
    }

    /// A chat message arrived. It counts as unread only while the panel is closed.
    pub fn chat_message_received(&self) {
        if !self.store.with_state(|s| s.is_chat_open) {
            self.store.dispatch(Action::IncrementUnreadChatCount);
        }
    }

    pub fn clear_unread(&self) {
        self.store.dispatch(Action::ClearUnreadChatCount);
    }

    pub fn unread_chat_count(&self) -> u32 {
        self.store.with_state(|s| s.unread_chat_count)
    }

    pub fn is_chat_open(&self) -> bool {
        self.store.with_state(|s| s.is_chat_open)
    }

    /// The chat panel exists only for signed-in users.
    pub fn chat_rendered(&self) -> bool {
        self.store.with_state(|s| s.logged_in)
    }
}
