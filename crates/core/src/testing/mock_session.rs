//! Mock session store for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::query::QueryState;
use crate::session::{SessionError, SessionSnapshot, SessionStore};

/// Mock implementation of the `SessionStore` trait.
///
/// Stores the snapshot in its serialized wire form, so save/load tests
/// exercise the same conversion path as the HTTP gateway. Supports
/// injected failures and an "unauthorized" mode where loads report no
/// snapshot.
pub struct MockSessionStore {
    snapshot: Arc<RwLock<Option<serde_json::Value>>>,
    saved: Arc<RwLock<Vec<QueryState>>>,
    next_save_error: Arc<RwLock<Option<SessionError>>>,
    next_load_error: Arc<RwLock<Option<SessionError>>>,
    unauthorized: AtomicBool,
}

impl std::fmt::Debug for MockSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSessionStore")
            .field("snapshot", &"<snapshot>")
            .field("saved", &"<saved>")
            .finish()
    }
}

impl Default for MockSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSessionStore {
    /// Create a mock store with no snapshot.
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
            saved: Arc::new(RwLock::new(Vec::new())),
            next_save_error: Arc::new(RwLock::new(None)),
            next_load_error: Arc::new(RwLock::new(None)),
            unauthorized: AtomicBool::new(false),
        }
    }

    /// Pre-populate the stored snapshot without counting as a save.
    pub async fn seed(&self, state: &QueryState) {
        let value = serde_json::to_value(SessionSnapshot::from(state)).expect("serialize snapshot");
        *self.snapshot.write().await = Some(value);
    }

    /// Configure the next `save` call to fail.
    pub async fn fail_next_save(&self, error: SessionError) {
        *self.next_save_error.write().await = Some(error);
    }

    /// Configure the next `load` call to fail.
    pub async fn fail_next_load(&self, error: SessionError) {
        *self.next_load_error.write().await = Some(error);
    }

    /// When set, loads behave as if the user is not logged in.
    pub fn set_unauthorized(&self, unauthorized: bool) {
        self.unauthorized.store(unauthorized, Ordering::SeqCst);
    }

    /// Every state passed to `save`, in call order.
    pub async fn saved_states(&self) -> Vec<QueryState> {
        self.saved.read().await.clone()
    }

    /// Number of completed saves.
    pub async fn save_count(&self) -> usize {
        self.saved.read().await.len()
    }

    /// The most recently saved state.
    pub async fn last_saved(&self) -> Option<QueryState> {
        self.saved.read().await.last().cloned()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn save(&self, state: &QueryState) -> Result<(), SessionError> {
        if let Some(error) = self.next_save_error.write().await.take() {
            return Err(error);
        }

        let value = serde_json::to_value(SessionSnapshot::from(state))
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        *self.snapshot.write().await = Some(value);
        self.saved.write().await.push(state.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<QueryState>, SessionError> {
        if let Some(error) = self.next_load_error.write().await.take() {
            return Err(error);
        }
        if self.unauthorized.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let Some(value) = self.snapshot.read().await.clone() else {
            return Ok(None);
        };
        let snapshot: SessionSnapshot = serde_json::from_value(value)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        QueryState::try_from(snapshot).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Letter, SearchFilters, SearchScope};

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = MockSessionStore::new();

        for state in [
            QueryState::default(),
            QueryState::default().browse_letter(Letter::Char('B')),
            QueryState::default().browse_genre(3),
            QueryState::default()
                .search(SearchFilters::title_only("space"), SearchScope::Token),
        ] {
            store.save(&state).await.unwrap();
            let restored = store.load().await.unwrap().unwrap();
            assert_eq!(restored, state);
        }
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let store = MockSessionStore::new();
        store.save(&QueryState::default().browse_genre(1)).await.unwrap();
        store.save(&QueryState::default().browse_genre(2)).await.unwrap();

        let restored = store.load().await.unwrap().unwrap();
        assert_eq!(restored, QueryState::default().browse_genre(2));
        assert_eq!(store.save_count().await, 2);
    }

    #[tokio::test]
    async fn test_unauthorized_load_is_no_snapshot() {
        let store = MockSessionStore::new();
        store.save(&QueryState::default().browse_genre(1)).await.unwrap();
        store.set_unauthorized(true);
        assert!(store.load().await.unwrap().is_none());
    }
}
