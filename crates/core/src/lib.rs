//! Query-state synchronization engine for a movie catalog browsing client.
//!
//! The core of the crate is [`CatalogBrowser`]: it owns the authoritative
//! [`QueryState`], reconciles it on view entry across session snapshot,
//! deep link, and default, and drives one fetch plus one session save per
//! user transition. [`AutocompleteCache`] serves the quick-search
//! suggestions independently of the query state.

pub mod autocomplete;
pub mod browser;
pub mod catalog;
pub mod config;
pub mod fetcher;
pub mod metrics;
pub mod query;
pub mod session;
pub mod testing;

pub use autocomplete::{AutocompleteCache, HttpSuggestBackend, Lookup, SuggestBackend, Suggestion};
pub use browser::{
    command_channel, BrowseCommand, CatalogBrowser, CommandReceiver, CommandSender, DeepLink,
    Origin,
};
pub use catalog::{
    CatalogBackend, CatalogError, GenreEntry, HttpCatalogBackend, MovieSummary, PageResult,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use fetcher::{FetchOrchestrator, FetchOutcome, ListView};
pub use query::{
    BrowseMode, Letter, Pager, QueryError, QueryState, SearchFilters, SearchScope, SortCriterion,
    SortOrder, SortSpec,
};
pub use session::{HttpSessionStore, SessionError, SessionSnapshot, SessionStore};
