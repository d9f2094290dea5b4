// File: mojito-core/src/api.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use url::Url;

use mojito_common::models::Post;
use mojito_common::traits::SocialApi;
use crate::http::HttpClient;
use crate::Error;

pub const CHECK_TOKEN_PATH: &str = "checkToken";
pub const HOME_FEED_PATH: &str = "getHomeFeed";

/// [`SocialApi`] over the backend's JSON endpoints.
pub struct HttpSocialApi {
    base_url: Url,
    client: Arc<dyn HttpClient<Error = Error>>,
}

impl HttpSocialApi {
    pub fn new(base_url: Url, client: Arc<dyn HttpClient<Error = Error>>) -> Self {
        Self { base_url, client }
    }

    fn endpoint(&self, path: &str) -> Result<String, Error> {
        // Without a trailing slash `join` would replace the last segment.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }
        Ok(base.join(path)?.to_string())
    }
}

#[async_trait]
impl SocialApi for HttpSocialApi {
    async fn check_token(&self, token: &str) -> Result<bool, Error> {
        let url = self.endpoint(CHECK_TOKEN_PATH)?;
        debug!("POST {}", url);
        let raw = self.client.post_json(url, json!({ "token": token })).await?;
        // The backend answers with a bare JSON boolean.
        let valid: bool = serde_json::from_str(raw.trim())?;
        Ok(valid)
    }

    async fn get_home_feed(&self, token: &str) -> Result<Vec<Post>, Error> {
        let url = self.endpoint(HOME_FEED_PATH)?;
        debug!("POST {}", url);
        let raw = self.client.post_json(url, json!({ "token": token })).await?;
        let posts: Vec<Post> = serde_json::from_str(&raw)?;
        Ok(posts)
    }
}
