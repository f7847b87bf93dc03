//! Live search suggestions under the header search input.

use crate::api::SearchBackend;
use crate::debounce::Debouncer;
use crate::markup;
use crate::types::SearchHit;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Suggestions {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub loading: bool,
    pub failed: bool,
}

pub struct SearchBox {
    state: Arc<Mutex<Suggestions>>,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    pub fn new(backend: Arc<dyn SearchBackend>, wait: Duration) -> Self {
        let state = Arc::new(Mutex::new(Suggestions::default()));
        let shared = Arc::clone(&state);
        let debouncer = Debouncer::new(wait, move |query: String| {
            let backend = Arc::clone(&backend);
            let shared = Arc::clone(&shared);
            async move {
                let result = backend.search(&query).await;
                let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if state.query != query {
                    tracing::debug!(%query, "discarding stale search response");
                    return;
                }
                state.loading = false;
                match result {
                    Ok(hits) => {
                        state.hits = hits;
                        state.failed = false;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, %query, "search failed");
                        state.hits.clear();
                        state.failed = true;
                    }
                }
            }
        });
        Self { state, debouncer }
    }

    fn lock(&self) -> MutexGuard<'_, Suggestions> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_input(&self, text: &str) {
        let query = text.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            self.clear();
            return;
        }
        {
            let mut state = self.lock();
            if state.query == query && !state.failed {
                return;
            }
            state.query = query.to_string();
            state.loading = true;
        }
        self.debouncer.call(query.to_string());
    }

    pub fn clear(&self) {
        self.debouncer.cancel();
        *self.lock() = Suggestions::default();
    }

    pub fn suggestions(&self) -> Suggestions {
        self.lock().clone()
    }

    pub fn render_html(&self) -> String {
        markup::search_suggestions(&self.lock().hits)
    }
}
