//! Mock catalog backend for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{
    CatalogBackend, CatalogError, GenreEntry, MovieSummary, PageResult,
};
use crate::query::QueryState;

/// A response handler that produces items and an artificial delay per
/// request, for simulating slow backends.
type ResponseHandler =
    Box<dyn Fn(&QueryState) -> (Vec<MovieSummary>, Duration) + Send + Sync>;

/// Mock implementation of the `CatalogBackend` trait.
///
/// Provides controllable behavior for testing:
/// - Serve a configured item list with server-like paging (offset/limit)
/// - Record every fetched query state for assertions
/// - Inject one-shot errors and per-request delays
pub struct MockCatalogBackend {
    results: Arc<RwLock<Vec<MovieSummary>>>,
    genres: Arc<RwLock<Vec<GenreEntry>>>,
    requests: Arc<RwLock<Vec<QueryState>>>,
    next_error: Arc<RwLock<Option<CatalogError>>>,
    handler: Arc<RwLock<Option<ResponseHandler>>>,
}

impl std::fmt::Debug for MockCatalogBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCatalogBackend")
            .field("results", &"<results>")
            .field("requests", &"<requests>")
            .field("handler", &"<handler>")
            .finish()
    }
}

impl Default for MockCatalogBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogBackend {
    /// Create a mock backend with no items.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            genres: Arc::new(RwLock::new(Vec::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock backend with a predefined item list.
    pub fn with_results(results: Vec<MovieSummary>) -> Self {
        Self {
            results: Arc::new(RwLock::new(results)),
            ..Self::new()
        }
    }

    /// Set the full item list the mock pages over.
    pub async fn set_results(&self, results: Vec<MovieSummary>) {
        *self.results.write().await = results;
    }

    /// Set the genre listing.
    pub async fn set_genres(&self, genres: Vec<GenreEntry>) {
        *self.genres.write().await = genres;
    }

    /// Configure the next `fetch_page` call to fail with the given error.
    pub async fn fail_next(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Replace the paging behavior with a per-request handler returning
    /// items and an artificial delay.
    pub async fn respond_with<F>(&self, handler: F)
    where
        F: Fn(&QueryState) -> (Vec<MovieSummary>, Duration) + Send + Sync + 'static,
    {
        *self.handler.write().await = Some(Box::new(handler));
    }

    /// Every query state fetched so far, in dispatch order.
    pub async fn recorded_requests(&self) -> Vec<QueryState> {
        self.requests.read().await.clone()
    }

    /// Number of fetches performed.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// The most recently fetched query state.
    pub async fn last_request(&self) -> Option<QueryState> {
        self.requests.read().await.last().cloned()
    }
}

#[async_trait]
impl CatalogBackend for MockCatalogBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_page(&self, state: &QueryState) -> Result<PageResult, CatalogError> {
        self.requests.write().await.push(state.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let handled = {
            let handler = self.handler.read().await;
            handler.as_ref().map(|h| h(state))
        };
        if let Some((items, delay)) = handled {
            tokio::time::sleep(delay).await;
            return Ok(PageResult::new(items, state.page_size));
        }

        // Server-like paging over the configured list.
        let all = self.results.read().await;
        let offset = (state.page * state.page_size) as usize;
        let items = if offset >= all.len() {
            Vec::new()
        } else {
            let end = (offset + state.page_size as usize).min(all.len());
            all[offset..end].to_vec()
        };

        Ok(PageResult::new(items, state.page_size))
    }

    async fn list_genres(&self) -> Result<Vec<GenreEntry>, CatalogError> {
        Ok(self.genres.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_pages_over_results() {
        let backend = MockCatalogBackend::new();
        backend.set_results(fixtures::movie_page(60)).await;

        let first = backend.fetch_page(&QueryState::default()).await.unwrap();
        assert_eq!(first.items.len(), 25);
        assert!(first.has_next_page());

        let third = backend
            .fetch_page(&QueryState::default().with_page(2))
            .await
            .unwrap();
        assert_eq!(third.items.len(), 10);
        assert!(!third.has_next_page());
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let backend = MockCatalogBackend::new();
        backend
            .fail_next(CatalogError::Transport("boom".to_string()))
            .await;

        assert!(backend.fetch_page(&QueryState::default()).await.is_err());
        assert!(backend.fetch_page(&QueryState::default()).await.is_ok());
        assert_eq!(backend.request_count().await, 2);
    }
}
