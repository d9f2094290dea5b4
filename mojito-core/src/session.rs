// File: mojito-core/src/session.rs

//! Top-level wiring for one page session: restore state from storage,
//! attach persistence, validate the stored token once, and mount/unmount
//! route views as the user navigates.
//!
//! The mounted view is kept by a store observer. What `/` shows depends on
//! `logged_in`, so a login or logout (including the forced one on token
//! expiry) remounts it in the same dispatch, cancelling the old feed request
//! before the transition returns.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use mojito_common::models::{ApplicationState, User};
use mojito_common::traits::{SessionStorage, SocialApi};
use crate::config::AppConfig;
use crate::persistence::SessionPersistence;
use crate::request::RequestOutcome;
use crate::routes::Route;
use crate::services::{FeedLoader, FeedState, FeedView, OverlayController, SessionValidator};
use crate::store::{Action, LogoutPolicy, StateObserver, StateStore, StoreHandle};

/// The view currently mounted for the active route.
struct MountedView {
    route: Route,
    /// Present only on the logged-in home page.
    feed: Option<FeedLoader>,
}

impl MountedView {
    fn unmount(&mut self) {
        if let Some(feed) = self.feed.as_mut() {
            feed.unmount();
        }
        debug!("unmounted {:?}", self.route);
    }
}

/// Owns the mounted view and keeps it in line with `logged_in`.
struct ViewSlot {
    api: Arc<dyn SocialApi>,
    timeout: Option<Duration>,
    current: Mutex<Option<MountedView>>,
}

impl ViewSlot {
    fn mount(&self, route: Route, state: &ApplicationState) -> MountedView {
        let feed = match (&state.user, route.loads_feed(state.logged_in)) {
            (Some(user), true) => Some(FeedLoader::mount(self.api.clone(), user, self.timeout)),
            _ => None,
        };
        debug!("mounted {:?} (feed={})", route, feed.is_some());
        MountedView { route, feed }
    }

    fn unmount(&self) {
        if let Some(mut view) = self.current.lock().take() {
            view.unmount();
        }
    }
}

impl StateObserver for ViewSlot {
    fn name(&self) -> &str {
        "view-slot"
    }

    fn observe(&self, previous: &ApplicationState, next: &ApplicationState) {
        if previous.logged_in == next.logged_in {
            return;
        }
        let mut current = self.current.lock();
        let Some(mut view) = current.take() else {
            return;
        };
        if view.route.loads_feed(previous.logged_in) == view.route.loads_feed(next.logged_in) {
            *current = Some(view);
            return;
        }
        view.unmount();
        *current = Some(self.mount(view.route, next));
    }
}

pub struct AppSession {
    store: StoreHandle,
    views: Arc<ViewSlot>,
    validator: SessionValidator,
    overlays: OverlayController,
}

impl AppSession {
    /// Build a session from config. Does not start any request yet.
    pub fn from_config(
        config: &AppConfig,
        storage: Arc<dyn SessionStorage>,
        api: Arc<dyn SocialApi>,
    ) -> Self {
        Self::new(storage, api, config.logout_policy, Some(config.request_timeout))
    }

    pub fn new(
        storage: Arc<dyn SessionStorage>,
        api: Arc<dyn SocialApi>,
        policy: LogoutPolicy,
        timeout: Option<Duration>,
    ) -> Self {
        let persistence = Arc::new(SessionPersistence::new(storage));
        let initial = persistence.load_initial_state();
        let store = StateStore::with_policy(initial, policy);
        store.add_observer(persistence);

        let views = Arc::new(ViewSlot {
            api: api.clone(),
            timeout,
            current: Mutex::new(None),
        });
        store.add_observer(views.clone());

        let mut validator = SessionValidator::new(api, store.clone());
        if let Some(t) = timeout {
            validator = validator.with_timeout(t);
        }
        let overlays = OverlayController::new(store.clone());

        Self {
            store,
            views,
            validator,
            overlays,
        }
    }

    /// Session start: kick off the one-time token check.
    pub fn start(&mut self) {
        let logged_in = self.store.with_state(|s| s.logged_in);
        info!("session starting (logged_in={})", logged_in);
        self.validator.activate();
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn state(&self) -> ApplicationState {
        self.store.state()
    }

    pub fn overlays(&self) -> &OverlayController {
        &self.overlays
    }

    pub fn login(&self, user: User) {
        self.store.dispatch(Action::Login(user));
    }

    pub fn logout(&self) {
        self.store.dispatch(Action::Logout);
    }

    pub fn flash(&self, text: &str) {
        self.store.dispatch(Action::FlashMessage(text.to_string()));
    }

    /// Unmount the current view (cancelling its work) and mount `path`.
    pub fn navigate(&self, path: &str) -> Route {
        let route = Route::resolve(path);
        let mut current = self.views.current.lock();
        if let Some(mut previous) = current.take() {
            previous.unmount();
        }
        let view = self.store.with_state(|s| self.views.mount(route.clone(), s));
        *current = Some(view);
        route
    }

    /// Route of the mounted view, if any.
    pub fn current_route(&self) -> Option<Route> {
        self.views.current.lock().as_ref().map(|v| v.route.clone())
    }

    /// Whether the mounted view has a live feed loader.
    pub fn has_feed(&self) -> bool {
        self.views
            .current
            .lock()
            .as_ref()
            .is_some_and(|v| v.feed.is_some())
    }

    pub fn feed_state(&self) -> Option<FeedState> {
        self.with_feed(FeedLoader::state)
    }

    pub fn feed_view(&self) -> Option<FeedView> {
        self.with_feed(FeedLoader::view)
    }

    fn with_feed<R>(&self, f: impl FnOnce(&FeedLoader) -> R) -> Option<R> {
        let current = self.views.current.lock();
        current.as_ref().and_then(|v| v.feed.as_ref()).map(f)
    }

    /// Wait for the mounted feed request to settle. The loader keeps
    /// ownership, so a later navigation or logout still cancels it.
    pub async fn feed_settled(&self) -> Option<RequestOutcome> {
        let waiter = self.with_feed(FeedLoader::waiter).flatten()?;
        Some(waiter.wait().await)
    }

    /// Wait for the startup token check, if one was started.
    pub async fn token_check_settled(&self) -> Option<RequestOutcome> {
        self.validator.settled().await
    }

    /// Tear everything down; outstanding requests are cancelled.
    pub fn shutdown(&mut self) {
        self.views.unmount();
        self.validator.deactivate();
        info!("session closed");
    }
}

impl Drop for AppSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
