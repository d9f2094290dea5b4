// File: mojito-common/src/models/state.rs

use serde::Serialize;
use crate::models::user::User;

/// The single session-wide state value.
///
/// Only the store in `mojito-core` mutates this; everybody else holds a
/// snapshot or a watch receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub logged_in: bool,
    pub user: Option<User>,
    /// Append-only; insertion order is display order.
    pub flash_messages: Vec<String>,
    pub is_search_open: bool,
    pub is_chat_open: bool,
    pub unread_chat_count: u32,
}

impl ApplicationState {
    /// State for a visitor without a stored session.
    pub fn guest() -> Self {
        Self::default()
    }

    /// State restored from a stored session triple.
    pub fn with_user(user: User) -> Self {
        Self {
            logged_in: true,
            user: Some(user),
            ..Self::default()
        }
    }

    /// Token of the current user, but only while logged in.
    pub fn active_token(&self) -> Option<&str> {
        if !self.logged_in {
            return None;
        }
        self.user.as_ref().map(|u| u.token.as_str())
    }
}
