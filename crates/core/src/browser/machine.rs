//! The catalog state machine.
//!
//! Owns the authoritative `QueryState` and drives every legal transition:
//! each one is a single atomic state replacement followed by exactly one
//! fetch dispatch and one session-save dispatch. The two dispatches are
//! independent; neither failure rolls back the state the user already saw.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogBackend, CatalogError, GenreEntry, PageResult};
use crate::fetcher::{FetchOrchestrator, FetchOutcome, ListView};
use crate::metrics;
use crate::query::{
    Letter, Pager, QueryError, QueryState, SearchFilters, SearchScope, SortCriterion, SortOrder,
};
use crate::session::SessionStore;

use super::commands::{BrowseCommand, CommandReceiver};
use super::deeplink::DeepLink;

/// Where the state shown after [`CatalogBrowser::enter`] came from.
///
/// The precedence is deliberate: session continuity beats deep links beats
/// defaults, so that returning to the view mid-session is not overridden by
/// a stale URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Restored from the server-side session snapshot.
    Session,
    /// Seeded from the view's URL parameters.
    DeepLink,
    /// Fell back to the default browse-all state.
    Default,
    /// The view was already entered; the live state was kept and no
    /// reconciliation ran.
    Retained,
}

/// Top-level coordinator of the catalog view.
pub struct CatalogBrowser {
    catalog: Arc<dyn CatalogBackend>,
    session: Arc<dyn SessionStore>,
    fetcher: FetchOrchestrator,
    state: RwLock<QueryState>,
    /// Last applied page, feeding the full-page pagination heuristic.
    last_page: RwLock<Option<PageResult>>,
    entered: AtomicBool,
}

impl CatalogBrowser {
    pub fn new(catalog: Arc<dyn CatalogBackend>, session: Arc<dyn SessionStore>) -> Self {
        let fetcher = FetchOrchestrator::new(Arc::clone(&catalog));
        Self {
            catalog,
            session,
            fetcher,
            state: RwLock::new(QueryState::default()),
            last_page: RwLock::new(None),
            entered: AtomicBool::new(false),
        }
    }

    /// The current query state.
    pub async fn state(&self) -> QueryState {
        self.state.read().await.clone()
    }

    /// The current list view (items, loading, error).
    pub async fn view(&self) -> ListView {
        self.fetcher.view().await
    }

    /// All genres, for the category browse menu.
    pub async fn genres(&self) -> Result<Vec<GenreEntry>, CatalogError> {
        self.catalog.list_genres().await
    }

    /// Resolve the initial state and issue its fetch. Runs once per view
    /// entry: on the first mount and again after [`leave`](Self::leave)
    /// (back-navigation), never on mere re-renders in between.
    pub async fn enter(&self, deep_link: Option<&DeepLink>) -> Origin {
        if self.entered.swap(true, Ordering::SeqCst) {
            return Origin::Retained;
        }

        match self.session.load().await {
            Ok(Some(restored)) if restored.is_meaningful() => {
                info!("Restoring catalog state from session snapshot");
                metrics::SESSION_LOADS.with_label_values(&["restored"]).inc();
                // Already persisted server-side; fetch without re-saving.
                self.apply(restored).await;
                return Origin::Session;
            }
            Ok(_) => {
                metrics::SESSION_LOADS.with_label_values(&["empty"]).inc();
            }
            Err(e) => {
                // Same fallback as having no snapshot at all.
                metrics::SESSION_LOADS.with_label_values(&["error"]).inc();
                warn!(error = %e, "Session load failed, falling back to deep link");
            }
        }

        if let Some(seeded) = deep_link.and_then(DeepLink::to_query_state) {
            info!("Seeding catalog state from deep link");
            self.commit(seeded).await;
            return Origin::DeepLink;
        }

        debug!("No snapshot or deep link, entering default browse-all state");
        self.apply(QueryState::default()).await;
        Origin::Default
    }

    /// Mark the view as left so the next [`enter`](Self::enter) re-runs
    /// reconciliation.
    pub fn leave(&self) {
        self.entered.store(false, Ordering::SeqCst);
    }

    /// Structured multi-field search.
    pub async fn search(&self, filters: SearchFilters) {
        let next = self.state().await.search(filters, SearchScope::Simple);
        self.commit(next).await;
    }

    /// Single-token search from the global quick-search entry point.
    pub async fn quick_search(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty quick search");
            return;
        }
        let next = self
            .state()
            .await
            .search(SearchFilters::title_only(text), SearchScope::Token);
        self.commit(next).await;
    }

    /// Alphabetic browse.
    pub async fn browse_letter(&self, letter: Letter) {
        let next = self.state().await.browse_letter(letter);
        self.commit(next).await;
    }

    /// Category browse.
    pub async fn browse_genre(&self, genre_id: u32) {
        let next = self.state().await.browse_genre(genre_id);
        self.commit(next).await;
    }

    /// Change the sort, resetting to the first page.
    pub async fn set_sort(&self, criterion: SortCriterion, order: SortOrder) {
        let next = self.state().await.with_sort(criterion, order);
        self.commit(next).await;
    }

    /// Change the page size, resetting to the first page.
    pub async fn set_page_size(&self, page_size: u32) -> Result<(), QueryError> {
        let next = self.state().await.with_page_size(page_size)?;
        self.commit(next).await;
        Ok(())
    }

    /// Move one page forward. A no-op unless the last page came back full.
    pub async fn next_page(&self) {
        let state = self.state().await;
        let last_page = self.last_page.read().await.clone();
        match Pager::next(&state, last_page.as_ref()) {
            Some(next) => self.commit(next).await,
            None => debug!("Ignoring next_page: no further page is believed to exist"),
        }
    }

    /// Move one page back. A no-op at page zero.
    pub async fn prev_page(&self) {
        let state = self.state().await;
        let next = Pager::prev(&state);
        if next.page == state.page {
            debug!("Ignoring prev_page at page zero");
            return;
        }
        self.commit(next).await;
    }

    /// Apply one command from the channel.
    pub async fn handle(&self, command: BrowseCommand) {
        match command {
            BrowseCommand::Search { filters } => self.search(filters).await,
            BrowseCommand::QuickSearch { text } => self.quick_search(&text).await,
            BrowseCommand::BrowseLetter { letter } => self.browse_letter(letter).await,
            BrowseCommand::BrowseGenre { genre_id } => self.browse_genre(genre_id).await,
            BrowseCommand::SetSort { criterion, order } => self.set_sort(criterion, order).await,
            BrowseCommand::SetPageSize { page_size } => {
                if let Err(e) = self.set_page_size(page_size).await {
                    warn!(error = %e, "Rejected page size command");
                }
            }
            BrowseCommand::NextPage => self.next_page().await,
            BrowseCommand::PrevPage => self.prev_page().await,
        }
    }

    /// Drain the command channel until every sender is dropped, applying
    /// commands in send order.
    pub async fn run_commands(&self, mut commands: CommandReceiver) {
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
        debug!("Command channel closed");
    }

    /// Replace the state and dispatch its fetch, without persisting. Used
    /// for session restores (already persisted) and the default state.
    async fn apply(&self, next: QueryState) {
        *self.state.write().await = next.clone();
        let outcome = self.fetcher.fetch(&next).await;
        self.record_page(outcome).await;
    }

    /// Replace the state, dispatch its fetch, and persist it.
    ///
    /// The save is fire-and-forget: the UI never blocks on it, and a
    /// failure is logged without reverting the transition. Saves are
    /// dispatched in transition order and each carries the full state, so
    /// out-of-order completion can only transiently persist a state that
    /// the following save overwrites.
    async fn commit(&self, next: QueryState) {
        *self.state.write().await = next.clone();

        let session = Arc::clone(&self.session);
        let to_save = next.clone();
        tokio::spawn(async move {
            match session.save(&to_save).await {
                Ok(()) => {
                    metrics::SESSION_SAVES.with_label_values(&["success"]).inc();
                }
                Err(e) => {
                    metrics::SESSION_SAVES.with_label_values(&["error"]).inc();
                    warn!(error = %e, "Session save failed, keeping in-memory state");
                }
            }
        });

        let outcome = self.fetcher.fetch(&next).await;
        self.record_page(outcome).await;
    }

    async fn record_page(&self, outcome: FetchOutcome) {
        if let FetchOutcome::Applied(page) = outcome {
            *self.last_page.write().await = Some(page);
        }
    }
}
