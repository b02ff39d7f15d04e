//! Session snapshot types.
//!
//! The snapshot is the serialized form of a `QueryState` persisted in the
//! server-side session store. Its wire shape is fixed by the existing
//! session endpoint, so conversion to and from `QueryState` lives here and
//! must round-trip losslessly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::{
    BrowseMode, Letter, QueryState, SearchFilters, SearchScope, SortCriterion, SortOrder,
    SortSpec, ALLOWED_PAGE_SIZES,
};

/// Errors from the session gateway.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Network-level or non-success HTTP failure.
    #[error("session request failed: {0}")]
    Transport(String),

    /// The stored snapshot did not decode into a valid query state.
    #[error("malformed session snapshot: {0}")]
    Malformed(String),
}

/// Which browse surface the snapshot was taken from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowseType {
    Title,
    Genre,
}

/// The search sub-state of a snapshot. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    #[serde(default)]
    pub movie_query: String,
    #[serde(default)]
    pub star_query: String,
    #[serde(default)]
    pub director_query: String,
    #[serde(default)]
    pub year_query: String,
    /// Scope of the search entry point. Absent means a structured search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_mode: Option<SearchScope>,
}

impl SearchSnapshot {
    /// True when no search field carries text.
    pub fn is_empty(&self) -> bool {
        self.movie_query.trim().is_empty()
            && self.star_query.trim().is_empty()
            && self.director_query.trim().is_empty()
            && self.year_query.trim().is_empty()
    }
}

/// Serialized `QueryState` on the session endpoint's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub browse_type: BrowseType,
    pub selected_letter: String,
    /// Negative values are the endpoint's encoding for "no genre".
    pub selected_genre_id: Option<i64>,
    pub search_state: SearchSnapshot,
    pub sort_criteria: String,
    pub sort_order: String,
    pub page_size: u32,
    pub current_page: u32,
}

impl From<&QueryState> for SessionSnapshot {
    fn from(state: &QueryState) -> Self {
        let (browse_type, selected_letter, selected_genre_id, search_state) = match &state.mode {
            BrowseMode::Title { letter } => {
                (BrowseType::Title, letter.as_str(), None, SearchSnapshot::default())
            }
            BrowseMode::Genre { genre_id } => (
                BrowseType::Genre,
                String::new(),
                Some(*genre_id as i64),
                SearchSnapshot::default(),
            ),
            BrowseMode::Search { filters, scope } => (
                BrowseType::Title,
                Letter::All.as_str(),
                None,
                SearchSnapshot {
                    movie_query: filters.title.clone().unwrap_or_default(),
                    star_query: filters.star.clone().unwrap_or_default(),
                    director_query: filters.director.clone().unwrap_or_default(),
                    year_query: filters.year.map(|y| y.to_string()).unwrap_or_default(),
                    search_mode: match scope {
                        SearchScope::Simple => None,
                        SearchScope::Token => Some(SearchScope::Token),
                    },
                },
            ),
        };

        Self {
            browse_type,
            selected_letter,
            selected_genre_id,
            search_state,
            sort_criteria: state.sort.criterion.as_param().to_string(),
            sort_order: state.sort.order.as_param().to_string(),
            page_size: state.page_size,
            current_page: state.page,
        }
    }
}

impl TryFrom<SessionSnapshot> for QueryState {
    type Error = SessionError;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self, Self::Error> {
        let mode = if !snapshot.search_state.is_empty() {
            let year = {
                let raw = snapshot.search_state.year_query.trim();
                if raw.is_empty() {
                    None
                } else {
                    Some(raw.parse::<u16>().map_err(|_| {
                        SessionError::Malformed(format!("yearQuery: {:?}", raw))
                    })?)
                }
            };
            BrowseMode::Search {
                filters: SearchFilters::new(
                    Some(snapshot.search_state.movie_query.as_str()),
                    Some(snapshot.search_state.star_query.as_str()),
                    Some(snapshot.search_state.director_query.as_str()),
                    year,
                ),
                scope: snapshot.search_state.search_mode.unwrap_or_default(),
            }
        } else if snapshot.browse_type == BrowseType::Genre {
            match snapshot.selected_genre_id {
                Some(id) if id >= 0 => BrowseMode::Genre { genre_id: id as u32 },
                _ => {
                    return Err(SessionError::Malformed(
                        "genre browse without a genre id".to_string(),
                    ))
                }
            }
        } else {
            let letter = Letter::parse(&snapshot.selected_letter)
                .map_err(|e| SessionError::Malformed(e.to_string()))?;
            BrowseMode::Title { letter }
        };

        let criterion = SortCriterion::from_param(&snapshot.sort_criteria).ok_or_else(|| {
            SessionError::Malformed(format!("sortCriteria: {:?}", snapshot.sort_criteria))
        })?;
        let order = SortOrder::from_param(&snapshot.sort_order).ok_or_else(|| {
            SessionError::Malformed(format!("sortOrder: {:?}", snapshot.sort_order))
        })?;

        if !ALLOWED_PAGE_SIZES.contains(&snapshot.page_size) {
            return Err(SessionError::Malformed(format!(
                "pageSize: {}",
                snapshot.page_size
            )));
        }

        Ok(QueryState {
            mode,
            sort: SortSpec::new(criterion, order),
            page: snapshot.current_page,
            page_size: snapshot.page_size,
        })
    }
}

/// Server-side persistence for the current query state.
///
/// Saves overwrite the previous snapshot; each save carries the full state,
/// so out-of-order completion of two saves can only transiently persist a
/// stale state that the next save overwrites.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the state, replacing any prior snapshot.
    async fn save(&self, state: &QueryState) -> Result<(), SessionError>;

    /// Load the persisted state. `Ok(None)` means "no session" or "no
    /// snapshot yet"; errors are genuine transport or decode failures.
    async fn load(&self) -> Result<Option<QueryState>, SessionError>;
}
