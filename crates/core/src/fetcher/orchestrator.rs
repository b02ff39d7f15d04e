//! Fetch orchestration with stale-response suppression.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::CatalogBackend;
use crate::metrics;
use crate::query::QueryState;

use super::types::{FetchOutcome, ListView};

/// Turns a query state into a single retrieval request and owns the view
/// state it resolves into.
///
/// Concurrency rule: winners are decided by issuance order, not arrival
/// order. Every dispatch takes a ticket from an atomic counter; when a
/// response lands, it is applied only if its ticket is still the newest
/// one issued. A slow response for an old query can therefore never
/// overwrite a newer query's results. "Cancellation" of the losing request
/// is purely logical; the transport call is left to finish and its result
/// dropped.
pub struct FetchOrchestrator {
    backend: Arc<dyn CatalogBackend>,
    view: tokio::sync::RwLock<ListView>,
    issued: AtomicU64,
}

impl FetchOrchestrator {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            view: tokio::sync::RwLock::new(ListView::default()),
            issued: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current view state.
    pub async fn view(&self) -> ListView {
        self.view.read().await.clone()
    }

    /// Dispatch one fetch for the given state.
    pub async fn fetch(&self, state: &QueryState) -> FetchOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut view = self.view.write().await;
            view.loading = true;
            view.error = None;
        }

        let result = self.backend.fetch_page(state).await;

        let mut view = self.view.write().await;
        if self.issued.load(Ordering::SeqCst) != ticket {
            // A newer fetch owns the view now, including its loading flag.
            metrics::STALE_RESULTS_DROPPED.inc();
            debug!(ticket = ticket, "Dropping stale fetch result");
            return FetchOutcome::Stale;
        }

        view.loading = false;
        match result {
            Ok(page) => {
                metrics::FETCHES_TOTAL.with_label_values(&["success"]).inc();
                view.has_next_page = page.has_next_page();
                view.items = Some(page.items.clone());
                view.error = None;
                FetchOutcome::Applied(page)
            }
            Err(e) => {
                metrics::FETCHES_TOTAL.with_label_values(&["error"]).inc();
                warn!(error = %e, "Catalog fetch failed, keeping previous items");
                view.error = Some(e.to_string());
                FetchOutcome::Failed(e)
            }
        }
    }
}
