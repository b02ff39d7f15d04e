//! Types for the fetch orchestrator.

use crate::catalog::{CatalogError, MovieSummary, PageResult};

/// What the view layer renders: the last good page plus loading/error
/// flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    /// The last successfully fetched items. `None` until the first fetch
    /// completes; kept untouched across failed refreshes so the screen is
    /// never blanked by an error.
    pub items: Option<Vec<MovieSummary>>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// User-visible message of the last failed fetch, cleared by the next
    /// successful one.
    pub error: Option<String>,
    /// Whether the last page came back full.
    pub has_next_page: bool,
}

/// Result of dispatching one fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The result was current and applied to the view.
    Applied(PageResult),
    /// A newer fetch was issued before this one resolved; the result was
    /// discarded and the view left alone.
    Stale,
    /// The fetch failed; the error was surfaced and the previous items
    /// kept.
    Failed(CatalogError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, FetchOutcome::Stale)
    }
}
