//! Debounced, memoized suggestion lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::AutocompleteConfig;
use crate::metrics;

use super::types::{CachedSuggestions, Lookup, SuggestBackend, Suggestion};

/// Default debounce applied before a cache miss hits the network.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Queries shorter than this never trigger a request.
pub const DEFAULT_MIN_QUERY_LEN: usize = 4;

/// Suggestion cache shared across the browsing session.
///
/// Keys are trimmed, lowercased query text. The cache is append-only:
/// concurrent lookups for different keys never conflict, and a race on the
/// same key only costs a redundant request whose result overwrites the
/// first one harmlessly.
///
/// Debounce cancellation uses a generation counter instead of ambient timer
/// handles: every lookup bumps the generation before sleeping and checks it
/// again afterwards, so a lookup superseded by a newer keystroke wakes up,
/// notices, and returns without touching the network.
pub struct AutocompleteCache {
    backend: Arc<dyn SuggestBackend>,
    entries: RwLock<HashMap<String, CachedSuggestions>>,
    generation: AtomicU64,
    debounce: Duration,
    min_query_len: usize,
}

impl AutocompleteCache {
    /// Create a cache with default debounce and minimum query length.
    pub fn new(backend: Arc<dyn SuggestBackend>) -> Self {
        Self {
            backend,
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(backend: Arc<dyn SuggestBackend>, config: &AutocompleteConfig) -> Self {
        Self::new(backend)
            .with_debounce(Duration::from_millis(config.debounce_ms))
            .with_min_query_len(config.min_query_len)
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Look up suggestions for raw input text.
    ///
    /// Short queries resolve immediately to an empty list, cache hits
    /// resolve immediately from memory, and misses wait out the debounce
    /// before issuing exactly one request. The await itself is the
    /// "loading" period from the caller's point of view.
    pub async fn lookup(&self, raw: &str) -> Lookup {
        let trimmed = raw.trim();
        let key = Self::normalize(raw);

        if key.chars().count() < self.min_query_len {
            metrics::AUTOCOMPLETE_LOOKUPS
                .with_label_values(&["short"])
                .inc();
            return Lookup::Ready(Vec::new());
        }

        if let Some(entry) = self.entries.read().await.get(&key) {
            metrics::AUTOCOMPLETE_LOOKUPS
                .with_label_values(&["hit"])
                .inc();
            return Lookup::Ready(entry.suggestions.clone());
        }

        // Claim a generation before sleeping; any later lookup invalidates
        // this one by claiming a newer generation.
        let claimed = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != claimed {
            metrics::AUTOCOMPLETE_LOOKUPS
                .with_label_values(&["superseded"])
                .inc();
            debug!(query = key.as_str(), "Suggestion lookup superseded");
            return Lookup::Superseded;
        }

        match self.backend.suggest(trimmed).await {
            Ok(suggestions) => {
                metrics::AUTOCOMPLETE_LOOKUPS
                    .with_label_values(&["miss"])
                    .inc();
                self.entries.write().await.insert(
                    key,
                    CachedSuggestions {
                        suggestions: suggestions.clone(),
                        fetched_at: Utc::now(),
                    },
                );
                Lookup::Ready(suggestions)
            }
            Err(e) => {
                // Suggestions are best-effort: degrade to an empty list and
                // leave the key uncached so a retry can succeed.
                metrics::AUTOCOMPLETE_LOOKUPS
                    .with_label_values(&["error"])
                    .inc();
                warn!(query = key.as_str(), error = %e, "Suggestion lookup failed");
                Lookup::Ready(Vec::new())
            }
        }
    }

    /// Peek at the cache without debouncing or fetching.
    pub async fn cached(&self, raw: &str) -> Option<Vec<Suggestion>> {
        self.entries
            .read()
            .await
            .get(&Self::normalize(raw))
            .map(|entry| entry.suggestions.clone())
    }

    /// Number of distinct cached queries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSuggestBackend;

    fn suggestion(id: &str, title: &str) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            title: title.to_string(),
            year: Some(1999),
        }
    }

    fn cache_with(results: Vec<Suggestion>) -> (Arc<MockSuggestBackend>, AutocompleteCache) {
        let backend = Arc::new(MockSuggestBackend::with_results(results));
        let cache = AutocompleteCache::new(Arc::clone(&backend) as Arc<dyn SuggestBackend>)
            .with_debounce(Duration::ZERO);
        (backend, cache)
    }

    #[tokio::test]
    async fn test_short_query_issues_no_request() {
        let (backend, cache) = cache_with(vec![]);
        assert_eq!(cache.lookup("mat").await, Lookup::Ready(vec![]));
        assert_eq!(cache.lookup("  ab ").await, Lookup::Ready(vec![]));
        assert_eq!(backend.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_same_normalized_query_fetches_once() {
        let (backend, cache) = cache_with(vec![suggestion("tt1", "The Matrix")]);

        let first = cache.lookup("Matrix").await;
        assert_eq!(first.suggestions().len(), 1);
        // Case and surrounding whitespace collapse onto the same key.
        let second = cache.lookup("  mAtRiX ").await;
        assert_eq!(second.suggestions().len(), 1);

        assert_eq!(backend.call_count().await, 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_backend_receives_trimmed_original_case() {
        let (backend, cache) = cache_with(vec![]);
        cache.lookup("  The Matrix  ").await;
        assert_eq!(backend.recorded_queries().await, vec!["The Matrix"]);
    }

    #[tokio::test]
    async fn test_backend_error_degrades_to_empty_and_does_not_cache() {
        let (backend, cache) = cache_with(vec![suggestion("tt1", "The Matrix")]);
        backend.fail_next("connection refused").await;

        assert_eq!(cache.lookup("matrix").await, Lookup::Ready(vec![]));
        assert!(cache.is_empty().await);

        // Retry succeeds and is cached.
        assert_eq!(cache.lookup("matrix").await.suggestions().len(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_lookup_supersedes_pending_debounce() {
        let backend = Arc::new(MockSuggestBackend::with_results(vec![suggestion(
            "tt2",
            "The Bourne Identity",
        )]));
        let cache = Arc::new(
            AutocompleteCache::new(Arc::clone(&backend) as Arc<dyn SuggestBackend>)
                .with_debounce(Duration::from_millis(300)),
        );

        let early = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.lookup("bourne ide").await })
        };
        // Let the first lookup reach its debounce sleep.
        tokio::task::yield_now().await;

        // The next keystroke claims a newer generation; the pending lookup
        // wakes, notices, and never reaches the backend.
        let late = cache.lookup("bourne iden").await;
        assert_eq!(late.suggestions().len(), 1);

        assert_eq!(early.await.unwrap(), Lookup::Superseded);
        assert_eq!(backend.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_cached_peek() {
        let (_backend, cache) = cache_with(vec![suggestion("tt1", "The Matrix")]);
        assert!(cache.cached("matrix").await.is_none());
        cache.lookup("matrix").await;
        assert_eq!(cache.cached("MATRIX ").await.unwrap().len(), 1);
    }
}
