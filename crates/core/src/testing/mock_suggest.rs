//! Mock suggestion backend for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::autocomplete::{SuggestBackend, SuggestError, Suggestion};

/// Mock implementation of the `SuggestBackend` trait.
///
/// Returns configured suggestions filtered by case-insensitive title
/// containment, records every query for call-count assertions, and can
/// fail the next request on demand.
pub struct MockSuggestBackend {
    results: Arc<RwLock<Vec<Suggestion>>>,
    queries: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for MockSuggestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSuggestBackend")
            .field("results", &"<results>")
            .field("queries", &"<queries>")
            .finish()
    }
}

impl Default for MockSuggestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSuggestBackend {
    /// Create a mock backend with no suggestions.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock backend with predefined suggestions.
    pub fn with_results(results: Vec<Suggestion>) -> Self {
        Self {
            results: Arc::new(RwLock::new(results)),
            ..Self::new()
        }
    }

    /// Set the suggestions subsequent requests filter over.
    pub async fn set_results(&self, results: Vec<Suggestion>) {
        *self.results.write().await = results;
    }

    /// Configure the next request to fail with a transport error.
    pub async fn fail_next(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    /// Every query received, in call order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Number of requests received.
    pub async fn call_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl SuggestBackend for MockSuggestBackend {
    async fn suggest(&self, title: &str) -> Result<Vec<Suggestion>, SuggestError> {
        self.queries.write().await.push(title.to_string());

        if let Some(message) = self.next_error.write().await.take() {
            return Err(SuggestError::Transport(message));
        }

        let needle = title.to_lowercase();
        let matches = self
            .results
            .read()
            .await
            .iter()
            .filter(|s| needle.is_empty() || s.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(id: &str, title: &str) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            title: title.to_string(),
            year: None,
        }
    }

    #[tokio::test]
    async fn test_filters_by_title_containment() {
        let backend = MockSuggestBackend::with_results(vec![
            suggestion("tt1", "The Matrix"),
            suggestion("tt2", "The Bourne Identity"),
        ]);

        let matches = backend.suggest("matrix").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "The Matrix");
        assert_eq!(backend.recorded_queries().await, vec!["matrix"]);
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let backend = MockSuggestBackend::new();
        backend.fail_next("down").await;
        assert!(backend.suggest("x").await.is_err());
        assert!(backend.suggest("x").await.is_ok());
    }
}
