//! View-entry reconciliation integration tests.
//!
//! These tests verify the initial-state precedence on every entry into the
//! catalog view: session snapshot > deep link > default, with degraded
//! session loads falling through instead of failing.

use std::sync::Arc;

use marquee_core::{
    testing::{fixtures, MockCatalogBackend, MockSessionStore},
    BrowseMode, CatalogBackend, CatalogBrowser, DeepLink, Letter, Origin, QueryState,
    SearchScope, SessionError, SessionStore,
};

struct TestHarness {
    catalog: Arc<MockCatalogBackend>,
    session: Arc<MockSessionStore>,
    browser: CatalogBrowser,
}

impl TestHarness {
    fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let catalog = Arc::new(MockCatalogBackend::new());
        let session = Arc::new(MockSessionStore::new());
        let browser = CatalogBrowser::new(
            Arc::clone(&catalog) as Arc<dyn CatalogBackend>,
            Arc::clone(&session) as Arc<dyn SessionStore>,
        );
        Self {
            catalog,
            session,
            browser,
        }
    }
}

/// Let fire-and-forget save tasks run to completion.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_session_snapshot_beats_deep_link() {
    let harness = TestHarness::new();
    let snapshot_state = QueryState::default().browse_letter(Letter::Char('B'));
    harness.session.seed(&snapshot_state).await;

    let deep_link = DeepLink::parse("?genreId=3");
    let origin = harness.browser.enter(Some(&deep_link)).await;

    assert_eq!(origin, Origin::Session);
    assert_eq!(harness.browser.state().await, snapshot_state);
    assert_eq!(harness.catalog.last_request().await, Some(snapshot_state));

    // A restore is already persisted server-side; no save is re-dispatched.
    settle().await;
    assert_eq!(harness.session.save_count().await, 0);
}

#[tokio::test]
async fn test_deep_link_seeds_when_no_snapshot() {
    let harness = TestHarness::new();

    let deep_link = DeepLink::parse("?genreId=3");
    let origin = harness.browser.enter(Some(&deep_link)).await;

    assert_eq!(origin, Origin::DeepLink);
    let state = harness.browser.state().await;
    assert_eq!(state.mode, BrowseMode::Genre { genre_id: 3 });
    assert_eq!(state.page, 0);

    // Deep-link-seeded states are persisted.
    settle().await;
    assert_eq!(harness.session.last_saved().await, Some(state));
}

#[tokio::test]
async fn test_quick_search_deep_link_restores_token_scope() {
    let harness = TestHarness::new();

    let deep_link = DeepLink::parse("title=space%20odyssey&searchMode=token");
    let origin = harness.browser.enter(Some(&deep_link)).await;

    assert_eq!(origin, Origin::DeepLink);
    match harness.browser.state().await.mode {
        BrowseMode::Search { filters, scope } => {
            assert_eq!(filters.title.as_deref(), Some("space odyssey"));
            assert_eq!(scope, SearchScope::Token);
        }
        other => panic!("expected search mode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_default_when_no_snapshot_and_no_deep_link() {
    let harness = TestHarness::new();

    let origin = harness.browser.enter(None).await;

    assert_eq!(origin, Origin::Default);
    assert_eq!(harness.browser.state().await, QueryState::default());
    assert_eq!(harness.catalog.request_count().await, 1);

    settle().await;
    assert_eq!(harness.session.save_count().await, 0);
}

#[tokio::test]
async fn test_browse_all_snapshot_is_not_meaningful() {
    // A persisted default state (letter All, no search, no genre) does not
    // shadow a deep link.
    let harness = TestHarness::new();
    harness.session.seed(&QueryState::default()).await;

    let deep_link = DeepLink::parse("?genreId=7");
    let origin = harness.browser.enter(Some(&deep_link)).await;

    assert_eq!(origin, Origin::DeepLink);
    assert_eq!(
        harness.browser.state().await.mode,
        BrowseMode::Genre { genre_id: 7 }
    );
}

#[tokio::test]
async fn test_failed_session_load_degrades_to_deep_link() {
    let harness = TestHarness::new();
    harness
        .session
        .fail_next_load(SessionError::Transport("boom".to_string()))
        .await;

    let deep_link = DeepLink::parse("?genreId=9");
    let origin = harness.browser.enter(Some(&deep_link)).await;

    assert_eq!(origin, Origin::DeepLink);
}

#[tokio::test]
async fn test_unauthorized_session_degrades_to_default() {
    let harness = TestHarness::new();
    harness
        .session
        .seed(&QueryState::default().browse_genre(4))
        .await;
    harness.session.set_unauthorized(true);

    let origin = harness.browser.enter(None).await;

    assert_eq!(origin, Origin::Default);
    assert_eq!(harness.browser.state().await, QueryState::default());
}

#[tokio::test]
async fn test_reentry_without_leaving_is_retained() {
    let harness = TestHarness::new();
    harness.session.seed(&QueryState::default().browse_genre(4)).await;

    assert_eq!(harness.browser.enter(None).await, Origin::Session);
    let requests_after_first = harness.catalog.request_count().await;

    // A re-render calls enter again; nothing re-runs.
    assert_eq!(harness.browser.enter(None).await, Origin::Retained);
    assert_eq!(harness.catalog.request_count().await, requests_after_first);
}

#[tokio::test]
async fn test_leave_then_enter_restores_own_last_transition() {
    let harness = TestHarness::new();
    harness.catalog.set_results(fixtures::movie_page(30)).await;

    assert_eq!(harness.browser.enter(None).await, Origin::Default);
    harness.browser.browse_genre(12).await;
    settle().await;

    // Navigate away and back: the state persisted by the genre transition
    // wins over a (now stale) deep link.
    harness.browser.leave();
    let deep_link = DeepLink::parse("?genreId=1");
    let origin = harness.browser.enter(Some(&deep_link)).await;

    assert_eq!(origin, Origin::Session);
    assert_eq!(
        harness.browser.state().await.mode,
        BrowseMode::Genre { genre_id: 12 }
    );
}
