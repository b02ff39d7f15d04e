//! HTTP implementation of the catalog retrieval service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::BackendConfig;
use crate::metrics;
use crate::query::{BrowseMode, QueryState, DEFAULT_PAGE_SIZE};

use super::types::{CatalogBackend, CatalogError, GenreEntry, MovieSummary, PageResult};

/// Catalog backend talking to the retrieval service over HTTP.
///
/// Requests carry the session cookie, so the client must be built with a
/// cookie store (`new` does this; `with_client` lets several gateways share
/// one jar).
pub struct HttpCatalogBackend {
    client: Client,
    base_url: String,
}

impl HttpCatalogBackend {
    /// Create a backend with its own cookie-carrying client.
    pub fn new(config: &BackendConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a backend over an existing client, sharing its cookie jar
    /// with the other gateways of the same session.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build request query pairs for a state.
    ///
    /// Parameters equal to server defaults are omitted (`page` 0,
    /// `pageSize` 25, `sortOrder` DESC, letter All); the server treats the
    /// missing parameter as the default, not as a cleared field.
    /// `sortCriteria` and its derived `tieBreaker` are always sent.
    pub(crate) fn query_pairs(state: &QueryState) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        match &state.mode {
            BrowseMode::Search { filters, .. } => {
                if let Some(title) = &filters.title {
                    pairs.push(("title", title.clone()));
                }
                if let Some(star) = &filters.star {
                    pairs.push(("star", star.clone()));
                }
                if let Some(director) = &filters.director {
                    pairs.push(("director", director.clone()));
                }
                if let Some(year) = filters.year {
                    pairs.push(("year", year.to_string()));
                }
            }
            BrowseMode::Title { letter } => {
                if let Some(letter) = letter.as_param() {
                    pairs.push(("letter", letter));
                }
            }
            BrowseMode::Genre { genre_id } => {
                pairs.push(("genreId", genre_id.to_string()));
            }
        }

        if state.page > 0 {
            pairs.push(("page", state.page.to_string()));
        }
        if state.page_size != DEFAULT_PAGE_SIZE {
            pairs.push(("pageSize", state.page_size.to_string()));
        }

        pairs.push(("sortCriteria", state.sort.criterion.as_param().to_string()));
        pairs.push((
            "tieBreaker",
            state.sort.criterion.tie_breaker_param().to_string(),
        ));
        if !state.sort.is_default_order() {
            pairs.push(("sortOrder", state.sort.order.as_param().to_string()));
        }

        pairs
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::AuthExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Transport(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(response)
    }
}

fn map_transport(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Transport("request timed out".to_string())
    } else {
        CatalogError::Transport(e.to_string())
    }
}

#[async_trait]
impl CatalogBackend for HttpCatalogBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_page(&self, state: &QueryState) -> Result<PageResult, CatalogError> {
        let url = format!("{}/movies", self.base_url);
        let pairs = Self::query_pairs(state);

        debug!(
            page = state.page,
            page_size = state.page_size,
            "Fetching catalog page"
        );

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&pairs)
            .send()
            .await
            .map_err(map_transport)?;
        metrics::REQUEST_DURATION
            .with_label_values(&["movies"])
            .observe(started.elapsed().as_secs_f64());

        let response = Self::check_status(response).await?;

        let items: Vec<MovieSummary> = response
            .json()
            .await
            .map_err(|e| CatalogError::MalformedResponse(format!("movie list: {}", e)))?;

        debug!(items = items.len(), "Catalog page fetched");

        Ok(PageResult::new(items, state.page_size))
    }

    async fn list_genres(&self) -> Result<Vec<GenreEntry>, CatalogError> {
        let url = format!("{}/movies", self.base_url);

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[("action", "listGenres")])
            .send()
            .await
            .map_err(map_transport)?;
        metrics::REQUEST_DURATION
            .with_label_values(&["genres"])
            .observe(started.elapsed().as_secs_f64());

        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| CatalogError::MalformedResponse(format!("genre list: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Letter, SearchFilters, SearchScope, SortCriterion, SortOrder};

    fn pair_map(state: &QueryState) -> std::collections::HashMap<&'static str, String> {
        HttpCatalogBackend::query_pairs(state).into_iter().collect()
    }

    #[test]
    fn test_default_state_omits_defaulted_params() {
        let pairs = pair_map(&QueryState::default());
        assert!(!pairs.contains_key("page"));
        assert!(!pairs.contains_key("pageSize"));
        assert!(!pairs.contains_key("sortOrder"));
        assert!(!pairs.contains_key("letter"));
        assert_eq!(pairs["sortCriteria"], "r.ratings");
        assert_eq!(pairs["tieBreaker"], "title");
    }

    #[test]
    fn test_search_params() {
        let state = QueryState::default().search(
            SearchFilters::new(Some("Matrix"), Some("Reeves"), None, Some(1999)),
            SearchScope::Simple,
        );
        let pairs = pair_map(&state);
        assert_eq!(pairs["title"], "Matrix");
        assert_eq!(pairs["star"], "Reeves");
        assert!(!pairs.contains_key("director"));
        assert_eq!(pairs["year"], "1999");
        assert!(!pairs.contains_key("letter"));
        assert!(!pairs.contains_key("genreId"));
    }

    #[test]
    fn test_letter_and_genre_params_are_exclusive() {
        let by_letter = pair_map(&QueryState::default().browse_letter(Letter::Char('B')));
        assert_eq!(by_letter["letter"], "B");
        assert!(!by_letter.contains_key("genreId"));

        let by_genre = pair_map(&QueryState::default().browse_genre(3));
        assert_eq!(by_genre["genreId"], "3");
        assert!(!by_genre.contains_key("letter"));
        assert!(!by_genre.contains_key("title"));
    }

    #[test]
    fn test_title_sort_sends_rating_tie_breaker() {
        let state = QueryState::default().with_sort(SortCriterion::Title, SortOrder::Ascending);
        let pairs = pair_map(&state);
        assert_eq!(pairs["sortCriteria"], "m.title");
        assert_eq!(pairs["tieBreaker"], "ratings");
        assert_eq!(pairs["sortOrder"], "ASC");
    }

    #[test]
    fn test_non_default_page_and_size_are_sent() {
        let state = QueryState::default()
            .with_page_size(50)
            .unwrap()
            .with_page(2);
        let pairs = pair_map(&state);
        assert_eq!(pairs["page"], "2");
        assert_eq!(pairs["pageSize"], "50");
    }

    #[test]
    fn test_page_size_change_resets_page_and_omits_page_param() {
        // Sorting on a later page, then changing the page size: sort stays,
        // the page resets to zero and drops out of the request entirely.
        let state = QueryState::default()
            .with_sort(SortCriterion::Title, SortOrder::Ascending)
            .with_page(2)
            .with_page_size(50)
            .unwrap();
        let pairs = pair_map(&state);
        assert!(!pairs.contains_key("page"));
        assert_eq!(pairs["pageSize"], "50");
        assert_eq!(pairs["sortCriteria"], "m.title");
        assert_eq!(pairs["sortOrder"], "ASC");
    }
}
