//! Pagination controller.
//!
//! All page movement goes through here: the view layer never writes the
//! page index directly. Forward movement is gated on the last fetch having
//! returned a full page.

use crate::catalog::PageResult;

use super::state::QueryState;

/// Derives next/previous page states from the current state and the last
/// fetched page.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pager;

impl Pager {
    /// State for the next page, or `None` when the last page was not full
    /// (no further rows are believed to exist) or nothing was fetched yet.
    pub fn next(state: &QueryState, last_page: Option<&PageResult>) -> Option<QueryState> {
        let last = last_page?;
        if !last.has_next_page() {
            return None;
        }
        Some(state.with_page(state.page + 1))
    }

    /// State for the previous page. A no-op at page zero.
    pub fn prev(state: &QueryState) -> QueryState {
        if state.page == 0 {
            state.clone()
        } else {
            state.with_page(state.page - 1)
        }
    }
}
