//! Sort order for catalog queries.
//!
//! The retrieval service orders rows by a primary criterion plus a fixed
//! tie-breaker. The tie-breaker is always the complementary field so that
//! ordering stays deterministic when the primary key has duplicates.

use serde::{Deserialize, Serialize};

/// Field the catalog list is ordered by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    Rating,
    Title,
}

impl SortCriterion {
    /// Wire value of the `sortCriteria` request parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortCriterion::Rating => "r.ratings",
            SortCriterion::Title => "m.title",
        }
    }

    /// Wire value of the `tieBreaker` request parameter.
    ///
    /// Always the complementary field: title breaks rating ties, rating
    /// breaks title ties.
    pub fn tie_breaker_param(&self) -> &'static str {
        match self {
            SortCriterion::Rating => "title",
            SortCriterion::Title => "ratings",
        }
    }

    /// Parse a wire value back into a criterion.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "r.ratings" => Some(SortCriterion::Rating),
            "m.title" => Some(SortCriterion::Title),
            _ => None,
        }
    }
}

/// Direction of the sort.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Wire value of the `sortOrder` request parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    /// Parse a wire value back into an order.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ASC" => Some(SortOrder::Ascending),
            "DESC" => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// Complete sort specification for a query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub criterion: SortCriterion,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(criterion: SortCriterion, order: SortOrder) -> Self {
        Self { criterion, order }
    }

    /// Whether this is the server-side default (rating, descending).
    ///
    /// The `sortOrder` parameter is omitted from requests when it equals
    /// the default; the server treats the missing parameter as DESC.
    pub fn is_default_order(&self) -> bool {
        self.order == SortOrder::Descending
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            criterion: SortCriterion::Rating,
            order: SortOrder::Descending,
        }
    }
}
