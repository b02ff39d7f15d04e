//! Debounced, memoized title suggestions.
//!
//! Feeds the lightweight suggestion dropdown next to the quick-search
//! input. Operates independently of the query state: suggestions never
//! participate in the browse/search state machine.

mod cache;
mod http;
mod types;

pub use cache::{AutocompleteCache, DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_QUERY_LEN};
pub use http::HttpSuggestBackend;
pub use types::{CachedSuggestions, Lookup, SuggestBackend, SuggestError, Suggestion};
