// File: mojito-core/tests/session_tests.rs

mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;

use mojito_common::models::User;
use mojito_common::traits::SessionStorage;
use mojito_core::persistence::{FileStorage, MemoryStorage, AVATAR_KEY, TOKEN_KEY, USERNAME_KEY};
use mojito_core::request::RequestOutcome;
use mojito_core::routes::Route;
use mojito_core::services::{FeedState, FeedView, SESSION_EXPIRED_MESSAGE};
use mojito_core::store::LogoutPolicy;
use mojito_core::AppSession;
use test_utils::{post, settle, user, GatedApi};

fn stored_session(storage: &MemoryStorage) {
    storage
        .set_many(&[(TOKEN_KEY, "t"), (USERNAME_KEY, "u"), (AVATAR_KEY, "a")])
        .unwrap();
}

#[tokio::test]
async fn test_login_persists_exact_triple() {
    let storage = Arc::new(MemoryStorage::new());
    let (api, _gates) = GatedApi::new();
    let session = AppSession::new(storage.clone(), api, LogoutPolicy::default(), None);

    session.login(User::new("t", "u", "a"));

    assert!(session.state().logged_in);
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("t"));
    assert_eq!(storage.get(USERNAME_KEY).unwrap().as_deref(), Some("u"));
    assert_eq!(storage.get(AVATAR_KEY).unwrap().as_deref(), Some("a"));
    assert_eq!(storage.len(), 3);
}

#[tokio::test]
async fn test_logout_keeps_user_in_memory_but_clears_storage() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, _gates) = GatedApi::new();
    let session = AppSession::new(storage.clone(), api, LogoutPolicy::RetainUser, None);

    session.logout();

    let state = session.state();
    assert!(!state.logged_in);
    // Observed behaviour, kept on purpose.
    assert_eq!(state.user, Some(user()));
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_logout_with_clear_policy_drops_user() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, _gates) = GatedApi::new();
    let session = AppSession::new(storage.clone(), api, LogoutPolicy::ClearUser, None);

    session.logout();

    assert_eq!(session.state().user, None);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_expired_token_at_startup() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, gates) = GatedApi::new();
    let mut session = AppSession::new(storage.clone(), api, LogoutPolicy::default(), None);
    let mut actions = session.store().subscribe();

    session.start();
    gates.check.send(Ok(false)).expect("check pending");
    assert_eq!(session.token_check_settled().await, Some(RequestOutcome::Completed));

    assert_eq!(actions.recv().await, Some(mojito_core::Action::Logout));
    assert_eq!(
        actions.recv().await,
        Some(mojito_core::Action::FlashMessage(SESSION_EXPIRED_MESSAGE.into()))
    );
    assert!(!session.state().logged_in);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_home_loads_feed_only_when_logged_in() {
    let storage = Arc::new(MemoryStorage::new());
    let (api, _gates) = GatedApi::new();
    let session = AppSession::new(storage, api.clone(), LogoutPolicy::default(), None);

    assert_eq!(session.navigate("/"), Route::Home);
    assert!(!session.has_feed());
    settle().await;
    assert_eq!(api.feed_calls(), 0);

    session.login(user());
    session.navigate("/");
    assert!(session.has_feed());
}

#[tokio::test]
async fn test_navigating_away_cancels_feed() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, gates) = GatedApi::new();
    let session = AppSession::new(storage, api, LogoutPolicy::default(), None);

    session.navigate("/");
    assert_eq!(session.feed_state(), Some(FeedState::default()));
    settle().await;

    assert_eq!(session.navigate("/about-us"), Route::About);
    assert_eq!(session.current_route(), Some(Route::About));
    assert!(!session.has_feed());

    let _ = gates.feed.send(Ok(vec![post("late")]));
    settle().await;
    assert_eq!(session.feed_state(), None);
}

#[tokio::test]
async fn test_feed_renders_after_load() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, gates) = GatedApi::new();
    let session = AppSession::new(storage, api, LogoutPolicy::default(), None);

    session.navigate("/");
    gates.feed.send(Ok(vec![post("1")])).expect("feed pending");

    assert_eq!(session.feed_settled().await, Some(RequestOutcome::Completed));
    assert!(matches!(session.feed_view(), Some(FeedView::Feed { ref posts, .. }) if posts.len() == 1));
}

#[tokio::test]
async fn test_logout_on_home_cancels_feed() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, gates) = GatedApi::new();
    let session = AppSession::new(storage, api, LogoutPolicy::default(), None);

    session.navigate("/");
    assert!(session.has_feed());
    settle().await;

    session.logout();
    assert_eq!(session.current_route(), Some(Route::Home));
    assert!(!session.has_feed());

    // The feed fetched with the old token arrives after the logout.
    let _ = gates.feed.send(Ok(vec![post("after-logout")]));
    settle().await;
    assert_eq!(session.feed_state(), None);
    assert_eq!(session.feed_view(), None);
}

#[tokio::test]
async fn test_expired_token_unmounts_home_feed() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, gates) = GatedApi::new();
    let mut session = AppSession::new(storage, api, LogoutPolicy::default(), None);

    session.start();
    session.navigate("/");
    settle().await;
    assert!(session.has_feed());

    gates.check.send(Ok(false)).expect("check pending");
    assert_eq!(session.token_check_settled().await, Some(RequestOutcome::Completed));
    assert!(!session.has_feed());

    let _ = gates.feed.send(Ok(vec![post("stale")]));
    settle().await;
    assert_eq!(session.feed_state(), None);
    assert_eq!(session.state().flash_messages, vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_login_on_home_mounts_feed() {
    let storage = Arc::new(MemoryStorage::new());
    let (api, _gates) = GatedApi::new();
    let session = AppSession::new(storage, api.clone(), LogoutPolicy::default(), None);

    session.navigate("/");
    assert!(!session.has_feed());

    session.login(user());
    assert!(session.has_feed());
    settle().await;
    assert_eq!(api.feed_calls(), 1);

    // Other routes are left alone.
    session.navigate("/about-us");
    session.logout();
    assert_eq!(session.current_route(), Some(Route::About));
}

#[tokio::test]
async fn test_abandoned_feed_wait_then_navigation_cancels() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, gates) = GatedApi::new();
    let session = AppSession::new(storage, api, LogoutPolicy::default(), None);

    session.navigate("/");
    let waited = tokio::time::timeout(Duration::from_millis(10), session.feed_settled()).await;
    assert!(waited.is_err());

    session.navigate("/Terms");
    let _ = gates.feed.send(Ok(vec![post("late")]));
    settle().await;
    assert_eq!(session.current_route(), Some(Route::Terms));
    assert_eq!(session.feed_state(), None);
}

#[tokio::test]
async fn test_overlays_follow_session_state() {
    let storage = Arc::new(MemoryStorage::new());
    let (api, _gates) = GatedApi::new();
    let session = AppSession::new(storage, api, LogoutPolicy::default(), None);
    let overlays = session.overlays();
    assert!(!overlays.chat_rendered());

    session.login(user());
    assert!(overlays.chat_rendered());

    overlays.chat_message_received();
    overlays.chat_message_received();
    assert_eq!(session.state().unread_chat_count, 2);
    overlays.toggle_chat();
    assert_eq!(session.state().unread_chat_count, 0);
    assert!(session.state().is_chat_open);

    overlays.open_search();
    overlays.close_search();
    assert!(overlays.search_mounted());
    overlays.await_search_exit().await;
    assert!(!overlays.search_mounted());
    assert!(!session.state().is_search_open);
}

#[tokio::test]
async fn test_session_restored_from_file_storage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let storage = Arc::new(FileStorage::new(&path));
        let (api, _gates) = GatedApi::new();
        let session = AppSession::new(storage, api, LogoutPolicy::default(), None);
        session.login(User::new("tok", "maria", "https://gravatar.com/m"));
    }

    let storage = Arc::new(FileStorage::new(&path));
    let (api, _gates) = GatedApi::new();
    let session = AppSession::new(storage, api, LogoutPolicy::default(), None);
    let state = session.state();
    assert!(state.logged_in);
    assert_eq!(state.user, Some(User::new("tok", "maria", "https://gravatar.com/m")));
}

#[tokio::test]
async fn test_shutdown_cancels_pending_check() {
    let storage = Arc::new(MemoryStorage::new());
    stored_session(&storage);
    let (api, gates) = GatedApi::new();
    let mut session = AppSession::new(storage, api, LogoutPolicy::default(), None);
    let mut actions = session.store().subscribe();

    session.start();
    settle().await;
    session.shutdown();
    let _ = gates.check.send(Ok(false));
    settle().await;

    assert!(actions.try_recv().is_err());
    assert!(session.state().logged_in);
}
