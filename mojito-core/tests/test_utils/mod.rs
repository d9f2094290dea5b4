// File: mojito-core/tests/test_utils/mod.rs

// Shared fakes for the integration tests. `GatedApi` parks every boundary
// call on a oneshot so a test decides when (and whether) it resolves.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Map;
use tokio::sync::oneshot;

use mojito_common::models::{Post, User};
use mojito_common::traits::SocialApi;
use mojito_core::Error;

pub fn user() -> User {
    User::new("t", "u", "a")
}

pub fn post(id: &str) -> Post {
    Post {
        id: id.to_string(),
        title: Some(format!("post {}", id)),
        body: None,
        created_date: None,
        author: None,
        extra: Map::new(),
    }
}

pub struct Gates {
    pub check: oneshot::Sender<Result<bool, Error>>,
    pub feed: oneshot::Sender<Result<Vec<Post>, Error>>,
}

#[derive(Default)]
pub struct GatedApi {
    check: Mutex<Option<oneshot::Receiver<Result<bool, Error>>>>,
    feed: Mutex<Option<oneshot::Receiver<Result<Vec<Post>, Error>>>>,
    pub check_calls: AtomicUsize,
    pub feed_calls: AtomicUsize,
}

impl GatedApi {
    pub fn new() -> (Arc<Self>, Gates) {
        let (check_tx, check_rx) = oneshot::channel();
        let (feed_tx, feed_rx) = oneshot::channel();
        let api = Arc::new(Self {
            check: Mutex::new(Some(check_rx)),
            feed: Mutex::new(Some(feed_rx)),
            ..Default::default()
        });
        (api, Gates { check: check_tx, feed: feed_tx })
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn feed_calls(&self) -> usize {
        self.feed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SocialApi for GatedApi {
    async fn check_token(&self, _token: &str) -> Result<bool, Error> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        let rx = self.check.lock().take();
        match rx {
            Some(rx) => rx.await.map_err(|_| Error::Parse("check gate dropped".into()))?,
            None => Err(Error::Parse("check gate already used".into())),
        }
    }

    async fn get_home_feed(&self, _token: &str) -> Result<Vec<Post>, Error> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        let rx = self.feed.lock().take();
        match rx {
            Some(rx) => rx.await.map_err(|_| Error::Parse("feed gate dropped".into()))?,
            None => Err(Error::Parse("feed gate already used".into())),
        }
    }
}

/// Give spawned request tasks a chance to run.
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}
