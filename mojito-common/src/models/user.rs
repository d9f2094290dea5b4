// File: mojito-common/src/models/user.rs

use serde::{Deserialize, Serialize};

/// The signed-in account as the backend hands it back on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub token: String,
    pub username: String,
    pub avatar: String,
}

impl User {
    pub fn new(token: &str, username: &str, avatar: &str) -> Self {
        Self {
            token: token.to_string(),
            username: username.to_string(),
            avatar: avatar.to_string(),
        }
    }
}
