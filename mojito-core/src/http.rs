// File: mojito-core/src/http.rs

//! HTTP client abstraction for the backend boundary.
//!
//! The state engine only ever POSTs small JSON bodies and reads JSON back.
//! Putting that behind a trait lets the API layer be tested without a
//! network and keeps reqwest out of everything above it.
//!
//! # Example Usage:
//! ``
//! use crate::http::{HttpClient, DefaultHttpClient};
//!
//! let client: Arc<dyn HttpClient<Error = Error>> =
//!     Arc::new(DefaultHttpClient::new(Duration::from_secs(10))?);
//! let raw = client.post_json(url, serde_json::json!({ "token": token })).await?;
//! ``

use std::time::Duration;

use async_trait::async_trait;
use reqwest;
use serde_json::Value;
use crate::Error;

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// POST `body` as JSON and return the raw response text on a 2xx.
    async fn post_json(&self, url: String, body: Value) -> Result<String, Self::Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    type Error = Error;

    async fn post_json(&self, url: String, body: Value) -> Result<String, Self::Error> {
        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Backend {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}
