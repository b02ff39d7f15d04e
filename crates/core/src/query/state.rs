//! The query state value type.
//!
//! `QueryState` is the single authoritative description of what the catalog
//! view is currently showing. It is an immutable value: every transition
//! produces a new state, and the browse modes are a tagged enum so that at
//! most one mode's filters can ever be populated.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sort::{SortCriterion, SortOrder, SortSpec};

/// Page size used when the `pageSize` parameter is omitted.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Page sizes the retrieval service accepts.
pub const ALLOWED_PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

static LETTER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new("^[A-Z0-9]$").unwrap());

/// Errors from constructing query state values.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Letter must be "All" or a single character in `[A-Z0-9]`.
    #[error("invalid browse letter: {0:?}")]
    InvalidLetter(String),

    /// Page size must be one of [`ALLOWED_PAGE_SIZES`].
    #[error("page size {0} is not an allowed page size")]
    InvalidPageSize(u32),
}

/// Title bucket for alphabetic browsing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum Letter {
    /// No letter filter ("browse all").
    All,
    /// A single `[A-Z0-9]` bucket. Lowercase input is upcased on parse.
    Char(char),
}

impl Letter {
    /// Parse a letter value, accepting "All" or a single alphanumeric
    /// character (case-insensitively).
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Letter::All);
        }
        let upper = trimmed.to_ascii_uppercase();
        match upper.chars().next() {
            Some(c) if LETTER_PATTERN.is_match(&upper) => Ok(Letter::Char(c)),
            _ => Err(QueryError::InvalidLetter(value.to_string())),
        }
    }

    /// Value persisted in snapshots ("All" or the single character).
    pub fn as_str(&self) -> String {
        match self {
            Letter::All => "All".to_string(),
            Letter::Char(c) => c.to_string(),
        }
    }

    /// Wire value of the `letter` request parameter.
    ///
    /// `All` maps to `None`: the parameter is omitted and the server treats
    /// its absence as "unfiltered".
    pub fn as_param(&self) -> Option<String> {
        match self {
            Letter::All => None,
            Letter::Char(c) => Some(c.to_string()),
        }
    }
}

impl TryFrom<String> for Letter {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Letter::parse(&value)
    }
}

impl From<Letter> for String {
    fn from(letter: Letter) -> Self {
        letter.as_str()
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Whether a search came from the structured multi-field form or the
/// single-token quick-search entry point.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    Simple,
    Token,
}

/// Free-text filters for search mode. Empty fields are unfiltered axes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

impl SearchFilters {
    /// Build filters from raw form input, trimming whitespace and dropping
    /// empty fields.
    pub fn new(
        title: Option<&str>,
        star: Option<&str>,
        director: Option<&str>,
        year: Option<u16>,
    ) -> Self {
        fn clean(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Self {
            title: clean(title),
            star: clean(star),
            director: clean(director),
            year,
        }
    }

    /// Filters with only a title, as produced by the quick-search entry.
    pub fn title_only(title: &str) -> Self {
        Self::new(Some(title), None, None, None)
    }

    /// True when every field is unfiltered.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.star.is_none() && self.director.is_none() && self.year.is_none()
    }
}

/// The mutually exclusive retrieval strategy, carrying its own filters.
///
/// Representing the mode as a tagged enum makes the exclusivity invariant
/// structural: switching modes replaces the whole value, so the filters of
/// the other modes cannot survive a transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BrowseMode {
    /// Alphabetic browse by first character of the title.
    Title { letter: Letter },
    /// Category browse by genre id.
    Genre { genre_id: u32 },
    /// Free-text search over title/star/director/year.
    Search {
        filters: SearchFilters,
        scope: SearchScope,
    },
}

impl Default for BrowseMode {
    fn default() -> Self {
        BrowseMode::Title { letter: Letter::All }
    }
}

/// One complete view of the catalog: mode, sort, and pagination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryState {
    pub mode: BrowseMode,
    pub sort: SortSpec,
    /// Zero-based page index. Only the pagination controller moves this.
    pub page: u32,
    pub page_size: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            mode: BrowseMode::default(),
            sort: SortSpec::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    /// Transition to search mode. Resets the page and drops the filters of
    /// the other modes.
    pub fn search(&self, filters: SearchFilters, scope: SearchScope) -> Self {
        Self {
            mode: BrowseMode::Search { filters, scope },
            page: 0,
            ..self.clone()
        }
    }

    /// Transition to alphabetic browse. Resets the page.
    pub fn browse_letter(&self, letter: Letter) -> Self {
        Self {
            mode: BrowseMode::Title { letter },
            page: 0,
            ..self.clone()
        }
    }

    /// Transition to genre browse. Resets the page.
    pub fn browse_genre(&self, genre_id: u32) -> Self {
        Self {
            mode: BrowseMode::Genre { genre_id },
            page: 0,
            ..self.clone()
        }
    }

    /// Change the sort, keeping mode and filters and resetting the page.
    pub fn with_sort(&self, criterion: SortCriterion, order: SortOrder) -> Self {
        Self {
            sort: SortSpec::new(criterion, order),
            page: 0,
            ..self.clone()
        }
    }

    /// Change the page size, keeping mode/filters/sort and resetting the
    /// page. Rejects sizes outside [`ALLOWED_PAGE_SIZES`].
    pub fn with_page_size(&self, page_size: u32) -> Result<Self, QueryError> {
        if !ALLOWED_PAGE_SIZES.contains(&page_size) {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            page: 0,
            ..self.clone()
        })
    }

    /// Replace the page index. Restricted to the pagination controller so
    /// the view layer cannot jump to arbitrary pages.
    pub(crate) fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Whether this state carries a deliberate selection worth restoring:
    /// non-empty search filters, a letter other than All, or a genre.
    ///
    /// The default "browse all" state is not meaningful; restoring it would
    /// shadow a deep link that deserves to win.
    pub fn is_meaningful(&self) -> bool {
        match &self.mode {
            BrowseMode::Title { letter } => *letter != Letter::All,
            BrowseMode::Genre { .. } => true,
            BrowseMode::Search { filters, .. } => !filters.is_empty(),
        }
    }
}
