//! Shared test fixtures.

use crate::autocomplete::Suggestion;
use crate::catalog::{GenreEntry, MovieRating, MovieSummary};
use crate::query::{BrowseMode, QueryState, SearchFilters, SearchScope};

/// A movie summary with a rating and no credits.
pub fn movie(id: &str, title: &str, year: u16, rating: f32) -> MovieSummary {
    MovieSummary {
        id: id.to_string(),
        title: title.to_string(),
        year,
        director: "Test Director".to_string(),
        ratings: Some(MovieRating {
            ratings: rating,
            vote_count: 1000,
        }),
        stars: vec![],
        genres: vec![],
    }
}

/// A page of `n` generated movies.
pub fn movie_page(n: usize) -> Vec<MovieSummary> {
    (0..n)
        .map(|i| movie(&format!("tt{:07}", i), &format!("Movie {}", i), 2000, 7.5))
        .collect()
}

/// A page with the given titles.
pub fn titled_page(titles: &[&str]) -> Vec<MovieSummary> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| movie(&format!("tt{:07}", i), title, 2000, 7.5))
        .collect()
}

/// A genre entry.
pub fn genre(id: u32, name: &str) -> GenreEntry {
    GenreEntry {
        id,
        name: name.to_string(),
    }
}

/// A title suggestion.
pub fn suggestion(id: &str, title: &str, year: u16) -> Suggestion {
    Suggestion {
        id: id.to_string(),
        title: title.to_string(),
        year: Some(year),
    }
}

/// A simple title search state.
pub fn search_state(title: &str) -> QueryState {
    QueryState::default().search(SearchFilters::title_only(title), SearchScope::Simple)
}

/// The title filter of a search-mode state, if any.
pub fn search_title(state: &QueryState) -> Option<String> {
    match &state.mode {
        BrowseMode::Search { filters, .. } => filters.title.clone(),
        _ => None,
    }
}
