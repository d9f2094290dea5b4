// File: mojito-core/tests/feed_loader_tests.rs

mod test_utils;

use std::time::Duration;

use mojito_common::models::Post;
use mojito_core::request::RequestOutcome;
use mojito_core::services::{FeedLoader, FeedState, FeedView};
use mojito_core::Error;
use test_utils::{post, settle, user, GatedApi};

#[tokio::test]
async fn test_loaded_feed_keeps_backend_order() {
    let (api, gates) = GatedApi::new();
    let loader = FeedLoader::mount(api.clone(), &user(), None);
    assert_eq!(loader.view(), FeedView::Loading);

    gates.feed.send(Ok(vec![post("3"), post("1"), post("2")])).expect("request still waiting");
    assert_eq!(loader.settled().await, Some(RequestOutcome::Completed));

    let state = loader.state();
    assert!(!state.is_loading);
    let ids: Vec<&str> = state.feed.iter().map(Post::key).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
    assert!(matches!(loader.view(), FeedView::Feed { .. }));
    assert_eq!(api.feed_calls(), 1);
}

#[tokio::test]
async fn test_empty_feed_renders_empty_state() {
    let (api, gates) = GatedApi::new();
    let loader = FeedLoader::mount(api, &user(), None);

    gates.feed.send(Ok(vec![])).expect("request still waiting");
    assert_eq!(loader.settled().await, Some(RequestOutcome::Completed));

    assert_eq!(loader.view(), FeedView::Empty { username: "u".into() });
}

#[tokio::test]
async fn test_cancelled_load_leaves_view_state_untouched() {
    let (api, gates) = GatedApi::new();
    let mut loader = FeedLoader::mount(api, &user(), None);
    settle().await;
    let before = loader.state();

    loader.unmount();
    let _ = gates.feed.send(Ok(vec![post("late")]));
    settle().await;

    assert_eq!(loader.state(), before);
    assert_eq!(loader.state(), FeedState::default());
    assert!(!loader.is_mounted());
}

#[tokio::test]
async fn test_failed_load_stays_loading() {
    let (api, gates) = GatedApi::new();
    let loader = FeedLoader::mount(api, &user(), None);

    gates.feed.send(Err(Error::Backend { status: 500, body: String::new() })).expect("request still waiting");

    assert_eq!(loader.settled().await, Some(RequestOutcome::Failed));
    assert_eq!(loader.view(), FeedView::Loading);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let (api, _gates) = GatedApi::new();
    let loader = FeedLoader::mount(api, &user(), Some(Duration::from_millis(20)));

    assert_eq!(loader.settled().await, Some(RequestOutcome::Failed));
    assert!(loader.state().is_loading);
}

#[tokio::test]
async fn test_each_mount_issues_its_own_request() {
    let (first_api, first_gates) = GatedApi::new();
    let first = FeedLoader::mount(first_api, &user(), None);
    drop(first);
    let _ = first_gates.feed.send(Ok(vec![post("stale")]));

    let (second_api, second_gates) = GatedApi::new();
    let second = FeedLoader::mount(second_api.clone(), &user(), None);
    second_gates.feed.send(Ok(vec![post("fresh")])).expect("request still waiting");
    assert_eq!(second.settled().await, Some(RequestOutcome::Completed));

    assert_eq!(second.state().feed, vec![post("fresh")]);
    assert_eq!(second_api.feed_calls(), 1);
}

#[tokio::test]
async fn test_abandoned_wait_then_unmount_discards_late_feed() {
    let (api, gates) = GatedApi::new();
    let mut loader = FeedLoader::mount(api, &user(), None);

    let waited = tokio::time::timeout(Duration::from_millis(10), loader.settled()).await;
    assert!(waited.is_err());

    loader.unmount();
    let _ = gates.feed.send(Ok(vec![post("late")]));
    settle().await;

    assert_eq!(loader.state(), FeedState::default());
    assert_eq!(loader.settled().await, None);
}
