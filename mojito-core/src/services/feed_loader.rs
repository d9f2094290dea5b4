// File: mojito-core/src/services/feed_loader.rs

// Per-mount loader for the home feed. The loaded posts live in state owned
// by the mounted view, not in the application state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use mojito_common::models::{Post, User};
use mojito_common::traits::SocialApi;
use crate::request::{CancellableRequest, RequestHandle, RequestOutcome, RequestWaiter};

pub const FEED_HEADING: &str = "The Latest Those You Follow";

/// View-local state of the home page.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub is_loading: bool,
    pub feed: Vec<Post>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            is_loading: true,
            feed: Vec::new(),
        }
    }
}

/// What the home page shows for a given [`FeedState`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Loading,
    Feed { heading: &'static str, posts: Vec<Post> },
    Empty { username: String },
}

impl FeedView {
    pub fn render(state: &FeedState, username: &str) -> FeedView {
        if state.is_loading {
            FeedView::Loading
        } else if state.feed.is_empty() {
            FeedView::Empty { username: username.to_string() }
        } else {
            FeedView::Feed {
                heading: FEED_HEADING,
                posts: state.feed.clone(),
            }
        }
    }

    /// Plain-text form of the view, one line per entry.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            FeedView::Loading => vec!["...".to_string()],
            FeedView::Empty { username } => vec![
                format!("Hello {}, your feed is empty.", username),
                "Your feed displays the latest posts from the people you follow.".to_string(),
            ],
            FeedView::Feed { heading, posts } => {
                let mut lines = vec![heading.to_string()];
                for post in posts {
                    let title = post.title.as_deref().unwrap_or("(untitled)");
                    match post.author.as_ref() {
                        Some(author) => lines.push(format!("[{}] {} by {}", post.key(), title, author.username)),
                        None => lines.push(format!("[{}] {}", post.key(), title)),
                    }
                }
                lines
            }
        }
    }
}

/// The feed request belonging to one mount of the home view.
pub struct FeedLoader {
    username: String,
    state_rx: watch::Receiver<FeedState>,
    mounted: bool,
    request: Option<RequestHandle>,
}

impl FeedLoader {
    /// Mount the view and start loading for `user`.
    pub fn mount(api: Arc<dyn SocialApi>, user: &User, timeout: Option<Duration>) -> Self {
        let (state_tx, state_rx) = watch::channel(FeedState::default());
        let token = user.token.clone();

        let request = CancellableRequest::start_with_timeout(
            "getHomeFeed",
            timeout,
            async move { api.get_home_feed(&token).await },
            move |posts: Vec<Post>| {
                debug!("home feed loaded with {} post(s)", posts.len());
                state_tx.send_replace(FeedState {
                    is_loading: false,
                    feed: posts,
                });
            },
        );

        Self {
            username: user.username.clone(),
            state_rx,
            mounted: true,
            request: Some(request),
        }
    }

    pub fn state(&self) -> FeedState {
        self.state_rx.borrow().clone()
    }

    pub fn view(&self) -> FeedView {
        FeedView::render(&self.state_rx.borrow(), &self.username)
    }

    /// Receiver to await re-renders of this view.
    pub fn watch(&self) -> watch::Receiver<FeedState> {
        self.state_rx.clone()
    }

    /// Cancel the request; the view state is frozen from here on.
    pub fn unmount(&mut self) {
        self.mounted = false;
        if let Some(request) = self.request.take() {
            request.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Awaitable outcome of this mount's request; `None` once unmounted.
    pub fn waiter(&self) -> Option<RequestWaiter> {
        self.request.as_ref().map(RequestHandle::waiter)
    }

    /// Wait for the request to settle while staying mounted. The request
    /// stays owned by the loader, so abandoning the wait does not detach it.
    pub async fn settled(&self) -> Option<RequestOutcome> {
        Some(self.waiter()?.wait().await)
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        self.unmount();
    }
}
