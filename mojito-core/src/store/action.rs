// File: mojito-core/src/store/action.rs

//! The closed set of transitions and the pure function applying them.

use mojito_common::models::{ApplicationState, User};

/// Every legal way to change [`ApplicationState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Login(User),
    Logout,
    FlashMessage(String),
    OpenSearch,
    CloseSearch,
    ToggleChat,
    CloseChat,
    IncrementUnreadChatCount,
    ClearUnreadChatCount,
}

impl Action {
    /// Tag used in logs; matches the names the frontend has always used.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Login(_) => "login",
            Action::Logout => "logout",
            Action::FlashMessage(_) => "flashMessage",
            Action::OpenSearch => "openSearch",
            Action::CloseSearch => "closeSearch",
            Action::ToggleChat => "toggleChat",
            Action::CloseChat => "closeChat",
            Action::IncrementUnreadChatCount => "incrementUnreadChatCount",
            Action::ClearUnreadChatCount => "clearUnreadChatCount",
        }
    }
}

/// What `logout` does with the in-memory user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogoutPolicy {
    /// `user` survives logout; only `logged_in` flips.
    #[default]
    RetainUser,
    /// `user` is emptied together with `logged_in`.
    ClearUser,
}

/// Apply `action` to `state` and return the new state.
pub fn apply(mut state: ApplicationState, action: Action, policy: LogoutPolicy) -> ApplicationState {
    reduce(&mut state, action, policy);
    state
}

/// In-place form of [`apply`], used by the store to avoid an extra clone.
pub fn reduce(state: &mut ApplicationState, action: Action, policy: LogoutPolicy) {
    match action {
        Action::Login(user) => {
            state.logged_in = true;
            state.user = Some(user);
        }
        Action::Logout => {
            state.logged_in = false;
            if policy == LogoutPolicy::ClearUser {
                state.user = None;
            }
        }
        Action::FlashMessage(text) => {
            state.flash_messages.push(text);
        }
        Action::OpenSearch => {
            state.is_search_open = true;
        }
        Action::CloseSearch => {
            state.is_search_open = false;
        }
        Action::ToggleChat => {
            state.is_chat_open = !state.is_chat_open;
            if state.is_chat_open {
                state.unread_chat_count = 0;
            }
        }
        Action::CloseChat => {
            state.is_chat_open = false;
        }
        Action::IncrementUnreadChatCount => {
            // Messages read in an open panel are never unread.
            if !state.is_chat_open {
                state.unread_chat_count = state.unread_chat_count.saturating_add(1);
            }
        }
        Action::ClearUnreadChatCount => {
            state.unread_chat_count = 0;
        }
    }
}
