// File: mojito-core/src/store/mod.rs

//! Single-writer store for [`ApplicationState`].
//!
//! Every change goes through [`StoreHandle::dispatch`]. Dispatches are
//! serialized: one transition is fully applied, observed, and announced
//! before the next one starts, so dispatch order is application order.
//!
//! Consumers get two kinds of access:
//! - a read-only view (`state()` snapshots, or a `watch::Receiver` to await
//!   changes), and
//! - the ability to submit transitions (`dispatch`).
//!
//! Effects that must follow a transition synchronously (persistence) are
//! registered as [`StateObserver`]s. Anything that only wants to know what
//! happened can [`StoreHandle::subscribe`] to the stream of applied actions.

pub mod action;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use mojito_common::models::ApplicationState;

pub use action::{apply, reduce, Action, LogoutPolicy};

/// Synchronous reaction to a state change.
///
/// Observers run on the dispatching thread while the store is still held,
/// so they must not dispatch themselves.
pub trait StateObserver: Send + Sync {
    fn name(&self) -> &str;

    /// Called once when the observer is registered.
    fn attach(&self, _current: &ApplicationState) {}

    fn observe(&self, previous: &ApplicationState, next: &ApplicationState);
}

struct StoreCore {
    policy: LogoutPolicy,
    observers: Vec<Arc<dyn StateObserver>>,
    subscribers: Vec<mpsc::UnboundedSender<Action>>,
}

struct StoreInner {
    core: Mutex<StoreCore>,
    state_tx: watch::Sender<ApplicationState>,
}

/// Owner of the application state. Hand out [`StoreHandle`]s to everyone else.
pub struct StateStore;

impl StateStore {
    pub fn new(initial: ApplicationState) -> StoreHandle {
        Self::with_policy(initial, LogoutPolicy::default())
    }

    pub fn with_policy(initial: ApplicationState, policy: LogoutPolicy) -> StoreHandle {
        let (state_tx, _) = watch::channel(initial);
        StoreHandle {
            inner: Arc::new(StoreInner {
                core: Mutex::new(StoreCore {
                    policy,
                    observers: Vec::new(),
                    subscribers: Vec::new(),
                }),
                state_tx,
            }),
        }
    }
}

/// Cloneable access to the store: read the state, submit transitions.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<StoreInner>,
}

impl StoreHandle {
    /// Snapshot of the current state.
    pub fn state(&self) -> ApplicationState {
        self.inner.state_tx.borrow().clone()
    }

    /// Read `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ApplicationState) -> R) -> R {
        f(&self.inner.state_tx.borrow())
    }

    /// Read-only view that is notified on every transition.
    pub fn watch(&self) -> watch::Receiver<ApplicationState> {
        self.inner.state_tx.subscribe()
    }

    /// Register an observer and let it sync up with the current state.
    pub fn add_observer(&self, observer: Arc<dyn StateObserver>) {
        let mut core = self.inner.core.lock();
        debug!("registering state observer '{}'", observer.name());
        observer.attach(&self.inner.state_tx.borrow());
        core.observers.push(observer);
    }

    /// Stream of applied actions, in application order.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Action> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.core.lock().subscribers.push(tx);
        rx
    }

    /// Apply one transition. Never fails.
    pub fn dispatch(&self, action: Action) {
        let mut core = self.inner.core.lock();
        self.apply_locked(&mut core, action);
    }

    /// Apply several transitions back to back. No other dispatch can land
    /// between them.
    pub fn dispatch_all(&self, actions: impl IntoIterator<Item = Action>) {
        let mut core = self.inner.core.lock();
        for action in actions {
            self.apply_locked(&mut core, action);
        }
    }

    fn apply_locked(&self, core: &mut StoreCore, action: Action) {
        let previous = self.inner.state_tx.borrow().clone();
        let mut next = previous.clone();
        reduce(&mut next, action.clone(), core.policy);
        self.inner.state_tx.send_replace(next.clone());

        debug!("applied '{}'", action.name());

        for observer in &core.observers {
            observer.observe(&previous, &next);
        }

        // Drop subscribers whose receiver went away.
        core.subscribers.retain(|tx| tx.send(action.clone()).is_ok());
    }
}
