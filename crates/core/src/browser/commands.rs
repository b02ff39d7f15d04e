//! Browse command channel.
//!
//! Cross-component triggers (the global quick-search box, the genre menu,
//! pagination buttons) reach the state machine as messages on a single
//! channel instead of through injected callbacks. The browser drains the
//! channel and applies commands in send order.

use tokio::sync::mpsc;

use crate::query::{Letter, SearchFilters, SortCriterion, SortOrder};

/// A user-triggered catalog transition.
#[derive(Debug, Clone)]
pub enum BrowseCommand {
    /// Structured multi-field search.
    Search { filters: SearchFilters },
    /// Single free-text token search from the global entry point.
    QuickSearch { text: String },
    /// Alphabetic browse.
    BrowseLetter { letter: Letter },
    /// Category browse.
    BrowseGenre { genre_id: u32 },
    /// Change sort criterion and order.
    SetSort {
        criterion: SortCriterion,
        order: SortOrder,
    },
    /// Change page size.
    SetPageSize { page_size: u32 },
    /// Move one page forward.
    NextPage,
    /// Move one page back.
    PrevPage,
}

/// Sending half handed to UI components.
pub type CommandSender = mpsc::UnboundedSender<BrowseCommand>;

/// Receiving half owned by the browser's command loop.
pub type CommandReceiver = mpsc::UnboundedReceiver<BrowseCommand>;

/// Create a command channel pair.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}
