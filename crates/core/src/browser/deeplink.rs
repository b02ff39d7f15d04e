//! Deep-link parameters consumed from the catalog view's own URL.

use std::borrow::Cow;

use crate::query::{QueryState, SearchFilters, SearchScope};

/// Parsed deep-link parameters: a genre id, or a free-text title with its
/// search scope. Used only to seed an initial query state when no session
/// snapshot is worth restoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeepLink {
    pub genre_id: Option<u32>,
    pub title: Option<String>,
    pub search_mode: SearchScope,
}

impl DeepLink {
    /// Parse a raw URL query string (with or without the leading `?`).
    ///
    /// Unknown parameters are ignored; a genre id that does not parse as a
    /// non-negative integer is dropped rather than surfaced.
    pub fn parse(query: &str) -> Self {
        let raw = query.trim_start_matches('?');
        let mut link = DeepLink::default();

        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, value),
                None => (pair, ""),
            };
            let value = value.replace('+', " ");
            let value = urlencoding::decode(&value)
                .map(Cow::into_owned)
                .unwrap_or(value);

            match key {
                "genreId" => link.genre_id = value.trim().parse().ok(),
                "title" => {
                    let title = value.trim();
                    if !title.is_empty() {
                        link.title = Some(title.to_string());
                    }
                }
                "searchMode" => {
                    if value.trim().eq_ignore_ascii_case("token") {
                        link.search_mode = SearchScope::Token;
                    }
                }
                _ => {}
            }
        }

        link
    }

    /// True when the link carries nothing that could seed a state.
    pub fn is_empty(&self) -> bool {
        self.genre_id.is_none() && self.title.is_none()
    }

    /// Build the query state this link encodes, if any. A genre id takes
    /// precedence over a free-text title.
    pub fn to_query_state(&self) -> Option<QueryState> {
        if let Some(genre_id) = self.genre_id {
            Some(QueryState::default().browse_genre(genre_id))
        } else {
            self.title.as_ref().map(|title| {
                QueryState::default().search(SearchFilters::title_only(title), self.search_mode)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::BrowseMode;

    #[test]
    fn test_parse_genre_link() {
        let link = DeepLink::parse("?genreId=3");
        assert_eq!(link.genre_id, Some(3));
        assert!(link.title.is_none());

        let state = link.to_query_state().unwrap();
        assert_eq!(state.mode, BrowseMode::Genre { genre_id: 3 });
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_parse_token_search_link() {
        let link = DeepLink::parse("title=space%20odyssey&searchMode=token");
        assert_eq!(link.title.as_deref(), Some("space odyssey"));
        assert_eq!(link.search_mode, SearchScope::Token);

        let state = link.to_query_state().unwrap();
        match state.mode {
            BrowseMode::Search { filters, scope } => {
                assert_eq!(filters.title.as_deref(), Some("space odyssey"));
                assert_eq!(scope, SearchScope::Token);
            }
            other => panic!("expected search mode, got {:?}", other),
        }
    }

    #[test]
    fn test_plus_encoded_spaces() {
        let link = DeepLink::parse("title=the+matrix");
        assert_eq!(link.title.as_deref(), Some("the matrix"));
    }

    #[test]
    fn test_search_mode_defaults_to_simple() {
        let link = DeepLink::parse("title=matrix");
        assert_eq!(link.search_mode, SearchScope::Simple);
    }

    #[test]
    fn test_genre_takes_precedence_over_title() {
        let link = DeepLink::parse("genreId=5&title=matrix");
        let state = link.to_query_state().unwrap();
        assert_eq!(state.mode, BrowseMode::Genre { genre_id: 5 });
    }

    #[test]
    fn test_invalid_or_negative_genre_id_is_dropped() {
        assert!(DeepLink::parse("genreId=abc").genre_id.is_none());
        assert!(DeepLink::parse("genreId=-3").genre_id.is_none());
    }

    #[test]
    fn test_empty_and_unknown_params() {
        assert!(DeepLink::parse("").is_empty());
        assert!(DeepLink::parse("?utm_source=mail&page=4").is_empty());
        assert!(DeepLink::parse("title=%20%20").is_empty());
        assert_eq!(DeepLink::parse("").to_query_state(), None);
    }
}
