//! Types for the suggestion service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single title suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// A cached suggestion list with its fetch time.
///
/// Entries are keyed by normalized query text and never expire within a
/// session; the cache only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSuggestions {
    pub suggestions: Vec<Suggestion>,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a suggestion lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Suggestions are ready. May be empty for short queries or backend
    /// failures.
    Ready(Vec<Suggestion>),
    /// A newer keystroke superseded this lookup during its debounce window;
    /// no request was made and the caller should drop the result.
    Superseded,
}

impl Lookup {
    /// The suggestions, treating a superseded lookup as empty.
    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Lookup::Ready(suggestions) => suggestions,
            Lookup::Superseded => &[],
        }
    }
}

/// Errors from the suggestion service.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Network-level or non-success HTTP failure.
    #[error("suggestion request failed: {0}")]
    Transport(String),

    /// The response body did not decode into a suggestion list.
    #[error("malformed suggestion response: {0}")]
    Malformed(String),
}

/// The suggestion service behind the quick-search input.
#[async_trait]
pub trait SuggestBackend: Send + Sync {
    /// Fetch suggestions for a title prefix/fragment.
    async fn suggest(&self, title: &str) -> Result<Vec<Suggestion>, SuggestError>;
}
