//! Debounced place search
//!
//! Each keystroke replaces the pending search; only a query left alone for
//! the debounce window reaches the provider. Outcomes arrive on a channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::map::{PlaceResult, PlaceSearch};

/// Queries shorter than this (in characters) hide the results instead of searching
pub const MIN_QUERY_CHARS: usize = 2;

pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Results shown per query
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Query too short; hide the result list
    Cleared,
    Results {
        query: String,
        places: Vec<PlaceResult>,
    },
    Failed {
        query: String,
        message: String,
    },
}

pub struct DebouncedSearch {
    provider: Arc<dyn PlaceSearch>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    outcomes: mpsc::UnboundedSender<SearchOutcome>,
}

impl DebouncedSearch {
    pub fn new(provider: Arc<dyn PlaceSearch>) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        Self::with_delay(provider, DEBOUNCE)
    }

    pub fn with_delay(
        provider: Arc<dyn PlaceSearch>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (
            Self {
                provider,
                delay,
                pending: None,
                outcomes,
            },
            rx,
        )
    }

    /// Feed the current contents of the search box
    pub fn input(&mut self, query: &str) {
        self.cancel();

        let query = query.trim().to_string();
        if query.chars().count() < MIN_QUERY_CHARS {
            let _ = self.outcomes.send(SearchOutcome::Cleared);
            return;
        }

        let provider = Arc::clone(&self.provider);
        let outcomes = self.outcomes.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Searching places for '{}'", query);

            let outcome = match provider.search(&query).await {
                Ok(mut places) => {
                    places.truncate(MAX_RESULTS);
                    SearchOutcome::Results { query, places }
                }
                Err(e) => {
                    warn!("Place search for '{}' failed: {}", query, e);
                    SearchOutcome::Failed {
                        query,
                        message: e.to_string(),
                    }
                }
            };
            let _ = outcomes.send(outcome);
        }));
    }

    /// Drop any search still waiting out the debounce window
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
