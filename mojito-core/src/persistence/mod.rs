// File: mojito-core/src/persistence/mod.rs

//! Mirrors the signed-in session to durable storage and reads it back at
//! startup. The three keys always move together.

pub mod file;
pub mod memory;

use std::sync::Arc;

use tracing::{debug, error, info};

use mojito_common::models::{ApplicationState, User};
use mojito_common::traits::SessionStorage;
use crate::Error;
use crate::store::StateObserver;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const AVATAR_KEY: &str = "avatar";

pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, USERNAME_KEY, AVATAR_KEY];

pub struct SessionPersistence {
    storage: Arc<dyn SessionStorage>,
}

impl SessionPersistence {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Build the startup state from whatever the storage holds.
    ///
    /// A stored, non-empty token means logged in. Missing username/avatar
    /// next to a token come back as empty strings. Read failures degrade to a
    /// guest session.
    pub fn load_initial_state(&self) -> ApplicationState {
        match self.load_user() {
            Ok(Some(user)) => {
                info!("restored session for '{}' from {}", user.username, self.storage.name());
                ApplicationState::with_user(user)
            }
            Ok(None) => ApplicationState::guest(),
            Err(e) => {
                error!("could not read stored session from {}: {:?}", self.storage.name(), e);
                ApplicationState::guest()
            }
        }
    }

    pub fn load_user(&self) -> Result<Option<User>, Error> {
        let token = match self.storage.get(TOKEN_KEY)? {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(None),
        };
        let username = self.storage.get(USERNAME_KEY)?.unwrap_or_default();
        let avatar = self.storage.get(AVATAR_KEY)?.unwrap_or_default();
        Ok(Some(User { token, username, avatar }))
    }

    /// Write the triple for `user`, or nothing.
    pub fn save(&self, user: &User) -> Result<(), Error> {
        self.storage.set_many(&[
            (TOKEN_KEY, user.token.as_str()),
            (USERNAME_KEY, user.username.as_str()),
            (AVATAR_KEY, user.avatar.as_str()),
        ])
    }

    pub fn clear(&self) -> Result<(), Error> {
        self.storage.remove_many(&SESSION_KEYS)
    }

    /// Make storage agree with `state`. Safe to call repeatedly.
    pub fn sync(&self, state: &ApplicationState) {
        let result = match (state.logged_in, state.user.as_ref()) {
            (true, Some(user)) => self.save(user),
            // Logged in without a user record cannot be produced by the
            // store; treat it like a logout.
            _ => self.clear(),
        };
        if let Err(e) = result {
            error!("failed to sync session to {}: {:?}", self.storage.name(), e);
        }
    }
}

impl StateObserver for SessionPersistence {
    fn name(&self) -> &str {
        "session_persistence"
    }

    fn attach(&self, current: &ApplicationState) {
        self.sync(current);
    }

    fn observe(&self, previous: &ApplicationState, next: &ApplicationState) {
        let login_changed = previous.logged_in != next.logged_in;
        let user_changed = next.logged_in && previous.user != next.user;
        if login_changed || user_changed {
            debug!("session fields changed (logged_in={}); syncing storage", next.logged_in);
            self.sync(next);
        }
    }
}
