// File: mojito-common/src/traits/api_traits.rs

use async_trait::async_trait;
use crate::error::Error;
use crate::models::post::Post;

/// The two backend calls the state engine consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// `true` while the token is still accepted by the backend.
    async fn check_token(&self, token: &str) -> Result<bool, Error>;

    /// Latest posts from followed users, in the backend's order.
    async fn get_home_feed(&self, token: &str) -> Result<Vec<Post>, Error>;
}
