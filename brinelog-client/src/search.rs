//! Debounced, rating-bounded batch search
//!
//! The engine holds the live filter (free-text query plus asymmetric
//! min/max star bounds), waits out a quiet period on every change, then
//! issues the query through a [`BatchIndex`]. Responses carry the
//! sequence number of the request that produced them; only the latest
//! issued request may update displayed results, so a slow response that
//! arrives after a newer one is discarded.

use async_trait::async_trait;
use brinelog_common::models::Batch;
use brinelog_common::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::debounce::Debouncer;

/// Quiet period between the last filter change and the issued query
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Star controls go from 1 to 5; 0 means the bound is unset
pub const MAX_STARS: u8 = 5;

/// Live search filter. Derived state, never persisted.
///
/// Invariant after every click: `min_rating == 0 || max_rating == 0 ||
/// min_rating <= max_rating`, maintained by mutual adjustment rather
/// than by rejecting input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub query: String,
    /// 0 = unbounded, else 1..=5
    pub min_rating: u8,
    /// 0 = unbounded, else 1..=5
    pub max_rating: u8,
}

impl SearchFilter {
    /// Click the star at position `star` (1..=5) on the minimum control
    ///
    /// Toggles the bound off if it already equals `star`. If the new
    /// minimum overruns a nonzero maximum, the maximum is reset to 0 —
    /// not raised. The asymmetry with [`click_max_star`] is deliberate
    /// and matches the shipped behavior.
    ///
    /// [`click_max_star`]: SearchFilter::click_max_star
    pub fn click_min_star(&mut self, star: u8) {
        let star = star.clamp(1, MAX_STARS);
        let new_min = if self.min_rating == star { 0 } else { star };
        self.min_rating = new_min;
        if self.max_rating > 0 && self.max_rating < new_min {
            self.max_rating = 0;
        }
    }

    /// Click the star at position `star` (1..=5) on the maximum control
    ///
    /// Toggles the bound off if it already equals `star`. If the new
    /// maximum is nonzero and below the minimum, the minimum is pulled
    /// down to equal it — not reset.
    pub fn click_max_star(&mut self, star: u8) {
        let star = star.clamp(1, MAX_STARS);
        let new_max = if self.max_rating == star { 0 } else { star };
        self.max_rating = new_max;
        if new_max > 0 && self.min_rating > new_max {
            self.min_rating = new_max;
        }
    }

    /// True when no text and no bound is set
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.min_rating == 0 && self.max_rating == 0
    }

    /// Query parameters for `GET /batches/`; unset fields are omitted
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.query.is_empty() {
            params.push(("recipe_name", self.query.clone()));
        }
        if self.min_rating > 0 {
            params.push(("min_rating", self.min_rating.to_string()));
        }
        if self.max_rating > 0 {
            params.push(("max_rating", self.max_rating.to_string()));
        }
        params
    }
}

/// Seam over the backend's filtered batch search
#[async_trait]
pub trait BatchIndex: Send + Sync {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Batch>>;
}

#[derive(Debug, Default)]
struct SearchState {
    results: Vec<Batch>,
    searching: bool,
}

/// Debounced search over batches with latest-request-wins ordering
pub struct BatchSearchEngine {
    index: Arc<dyn BatchIndex>,
    filter: SearchFilter,
    debouncer: Debouncer,
    issued_seq: Arc<AtomicU64>,
    state: Arc<Mutex<SearchState>>,
}

impl BatchSearchEngine {
    pub fn new(index: Arc<dyn BatchIndex>) -> Self {
        Self::with_quiet_period(index, QUIET_PERIOD)
    }

    /// Mainly for tests that want a different quiet period
    pub fn with_quiet_period(index: Arc<dyn BatchIndex>, quiet_period: Duration) -> Self {
        Self {
            index,
            filter: SearchFilter::default(),
            debouncer: Debouncer::new(quiet_period),
            issued_seq: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    /// Replace the free-text query and restart the quiet period
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.schedule();
    }

    pub fn click_min_star(&mut self, star: u8) {
        self.filter.click_min_star(star);
        self.schedule();
    }

    pub fn click_max_star(&mut self, star: u8) {
        self.filter.click_max_star(star);
        self.schedule();
    }

    /// Issue the current filter immediately, skipping the quiet period
    /// (initial page load)
    pub fn refresh_now(&mut self) {
        self.debouncer.cancel();
        let task = self.issue_task();
        tokio::spawn(task);
    }

    /// Displayed results (snapshot)
    pub fn results(&self) -> Vec<Batch> {
        self.state.lock().expect("search state poisoned").results.clone()
    }

    /// True while an issued query has not yet been applied or superseded
    pub fn is_searching(&self) -> bool {
        self.state.lock().expect("search state poisoned").searching
    }

    fn schedule(&mut self) {
        let task = self.issue_task();
        self.debouncer.call(task);
    }

    /// Build the future that issues the query for the current filter and
    /// applies the response unless it has been superseded.
    fn issue_task(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let index = Arc::clone(&self.index);
        let state = Arc::clone(&self.state);
        let issued_seq = Arc::clone(&self.issued_seq);
        let filter = self.filter.clone();

        async move {
            let seq = issued_seq.fetch_add(1, Ordering::SeqCst) + 1;
            state.lock().expect("search state poisoned").searching = true;

            let outcome = index.search(&filter).await;

            let mut state = state.lock().expect("search state poisoned");
            if issued_seq.load(Ordering::SeqCst) != seq {
                // A newer request was issued while this one was in
                // flight; it owns the display now.
                tracing::debug!(seq, "discarding stale search response");
                return;
            }
            state.searching = false;
            match outcome {
                Ok(batches) => {
                    state.results = batches;
                }
                Err(e) => {
                    // Keep the previous results on screen
                    tracing::error!("batch search failed: {}", e);
                }
            }
        }
    }
}
