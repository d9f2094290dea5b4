// File: mojito-core/src/services/session_validator.rs

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use mojito_common::traits::SocialApi;
use crate::request::{CancellableRequest, RequestHandle, RequestOutcome};
use crate::store::{Action, StoreHandle};

pub const SESSION_EXPIRED_MESSAGE: &str = "your session has expired. please login again";

/// Re-checks the stored token with the backend once per activation.
///
/// Activation reads the state at that moment; later `logged_in` changes do
/// not trigger another check.
pub struct SessionValidator {
    api: Arc<dyn SocialApi>,
    store: StoreHandle,
    timeout: Option<Duration>,
    active: bool,
    pending: Option<RequestHandle>,
}

impl SessionValidator {
    pub fn new(api: Arc<dyn SocialApi>, store: StoreHandle) -> Self {
        Self {
            api,
            store,
            timeout: None,
            active: false,
            pending: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Start the token check if a session is active. Returns `true` when a
    /// request was started. A second call while already active is a no-op.
    pub fn activate(&mut self) -> bool {
        if self.active {
            debug!("session validator already active");
            return false;
        }
        self.active = true;
        let Some(token) = self.store.with_state(|s| s.active_token().map(str::to_string)) else {
            debug!("no active session; skipping token check");
            return false;
        };

        let api = self.api.clone();
        let store = self.store.clone();
        let handle = CancellableRequest::start_with_timeout(
            "checkToken",
            self.timeout,
            async move { api.check_token(&token).await },
            move |valid: bool| {
                if !valid {
                    info!("stored token rejected by backend; logging out");
                    store.dispatch_all([
                        Action::Logout,
                        Action::FlashMessage(SESSION_EXPIRED_MESSAGE.to_string()),
                    ]);
                }
            },
        );
        self.pending = Some(handle);
        true
    }

    /// Cancel an outstanding check. Its result, if it ever arrives, is ignored.
    pub fn deactivate(&mut self) {
        self.active = false;
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Wait for the check started by this activation, if any. The check
    /// stays owned by the validator, so `deactivate` can still cancel it if
    /// this wait is abandoned.
    pub async fn settled(&self) -> Option<RequestOutcome> {
        let waiter = self.pending.as_ref()?.waiter();
        Some(waiter.wait().await)
    }
}

impl Drop for SessionValidator {
    fn drop(&mut self) {
        self.deactivate();
    }
}
