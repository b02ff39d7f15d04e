//! Types for the catalog retrieval service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::QueryState;

/// One catalog item as returned by the `/movies` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: u16,
    pub director: String,
    /// Aggregate rating. Absent for unrated titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<MovieRating>,
    /// Up to three headline stars.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stars: Vec<StarCredit>,
    /// Up to three genres.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<GenreEntry>,
}

/// Aggregate rating block nested in a movie summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRating {
    pub ratings: f32,
    #[serde(default)]
    pub vote_count: u32,
}

/// A star credit nested in a movie summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StarCredit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_count: Option<u32>,
}

/// A genre, both as nested in summaries and from the genre listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreEntry {
    pub id: u32,
    pub name: String,
}

/// One fetched page of catalog items.
///
/// The service never reports a total count; whether more pages exist is
/// inferred from the page being full. The inference is one page late when
/// the true count is an exact multiple of the page size.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<MovieSummary>,
    /// The page size the request asked for, kept for the full-page check.
    pub requested_page_size: u32,
}

impl PageResult {
    pub fn new(items: Vec<MovieSummary>, requested_page_size: u32) -> Self {
        Self {
            items,
            requested_page_size,
        }
    }

    /// True when the page came back full, meaning more rows may exist.
    pub fn has_next_page(&self) -> bool {
        self.items.len() as u32 == self.requested_page_size
    }
}

/// Errors from the catalog retrieval service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level or non-success HTTP failure.
    #[error("catalog request failed: {0}")]
    Transport(String),

    /// The session is no longer authorized. The embedding application is
    /// expected to redirect to login; this core only reports it.
    #[error("catalog session not authorized")]
    AuthExpired,

    /// The response body did not decode into the expected shape.
    #[error("malformed catalog response: {0}")]
    MalformedResponse(String),

    /// Caller-side parameter validation failure. Defensive only.
    #[error("invalid catalog query: {0}")]
    Validation(String),
}

/// The retrieval service behind the catalog view.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch one page of items for the given query state.
    async fn fetch_page(&self, state: &QueryState) -> Result<PageResult, CatalogError>;

    /// List all genres, for the category browse menu.
    async fn list_genres(&self) -> Result<Vec<GenreEntry>, CatalogError>;
}
