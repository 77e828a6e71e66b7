pub mod api;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::store::{SearchAction, SearchState, SearchStore};

use api::{SearchBackend, GENERIC_SEARCH_ERROR};

pub use api::{AlgoliaBackend, SearchResponse, SearchResult};

/// What caused an orchestration run: a settled query text, or an explicit
/// page navigation carrying its target index.
enum Trigger {
    QueryChanged,
    Page(u32),
}

struct SessionInner {
    store: SearchStore,
    backend: Arc<dyn SearchBackend>,
    // Bumped at the start of every run; a run whose generation is no longer
    // current when its response arrives discards the result instead of
    // overwriting newer state.
    generation: AtomicU64,
}

impl SessionInner {
    async fn run(&self, text: &str, trigger: Trigger) {
        if text.is_empty() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.store.dispatch(SearchAction::Clear).await;
            return;
        }

        let previous = self.store.snapshot().await;
        let page = match trigger {
            Trigger::Page(page) => page,
            Trigger::QueryChanged if text != previous.text => 0,
            Trigger::QueryChanged => previous.response.page,
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.store
            .dispatch(SearchAction::Start(text.to_string()))
            .await;

        let result = self.backend.search(text, page).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding superseded response for '{}' page {}", text, page);
            return;
        }

        match result {
            Ok(response) => {
                self.store.dispatch(SearchAction::Complete(response)).await;
            }
            Err(err) => {
                let mut message = err.to_string();
                if message.is_empty() {
                    message = GENERIC_SEARCH_ERROR.to_string();
                }
                self.store.dispatch(SearchAction::Error(message)).await;
            }
        }
    }
}

/// Ties the debouncer, the orchestration and the store together behind the
/// surface a presentation shell talks to: feed raw keystrokes in with
/// `set_query_text`, navigate with `request_next_page`/`request_prev_page`,
/// read results out of the store.
pub struct SearchSession {
    inner: Arc<SessionInner>,
    debouncer: Debouncer<String>,
    pump: JoinHandle<()>,
}

impl SearchSession {
    pub fn new(config: &SearchConfig) -> Self {
        let backend = Arc::new(AlgoliaBackend::new(config));
        Self::with_backend(config, backend)
    }

    /// Build a session over a custom backend. Tests drive this with
    /// hand-written `SearchBackend` doubles.
    pub fn with_backend(config: &SearchConfig, backend: Arc<dyn SearchBackend>) -> Self {
        let inner = Arc::new(SessionInner {
            store: SearchStore::new(),
            backend,
            generation: AtomicU64::new(0),
        });

        let debouncer = Debouncer::new(String::new(), Duration::from_millis(config.debounce_ms));
        let mut settled = debouncer.subscribe();

        // Each settled query runs in its own task, so a slow request never
        // delays a newer one; the generation guard in `run` keeps late
        // responses from clobbering newer state.
        let pump_inner = inner.clone();
        let pump = tokio::spawn(async move {
            while settled.changed().await.is_ok() {
                let text = settled.borrow().clone();
                let inner = pump_inner.clone();
                tokio::spawn(async move {
                    inner.run(&text, Trigger::QueryChanged).await;
                });
            }
        });

        info!("search session started (debounce {}ms)", config.debounce_ms);

        Self {
            inner,
            debouncer,
            pump,
        }
    }

    /// Update the raw (pre-debounce) query text.
    pub fn set_query_text(&self, text: &str) {
        self.debouncer.set(text.to_string());
    }

    /// Advance to the next page. No-op unless the current state says a next
    /// page exists; page and text are read from the store at call time.
    pub async fn request_next_page(&self) {
        let state = self.inner.store.snapshot().await;
        if !state.has_next_page() {
            debug!("next page requested but none available");
            return;
        }
        self.inner
            .run(&state.text, Trigger::Page(state.response.page + 1))
            .await;
    }

    /// Go back one page. No-op on the first page.
    pub async fn request_prev_page(&self) {
        let state = self.inner.store.snapshot().await;
        if !state.has_prev_page() {
            debug!("previous page requested but none available");
            return;
        }
        self.inner
            .run(&state.text, Trigger::Page(state.response.page - 1))
            .await;
    }

    pub fn store(&self) -> &SearchStore {
        &self.inner.store
    }

    pub async fn snapshot(&self) -> SearchState {
        self.inner.store.snapshot().await
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.store.subscribe()
    }

    pub async fn results(&self) -> Vec<SearchResult> {
        self.inner.store.snapshot().await.response.hits
    }

    pub async fn is_searching(&self) -> bool {
        self.inner.store.snapshot().await.is_searching
    }

    pub async fn error(&self) -> String {
        self.inner.store.snapshot().await.error
    }

    pub async fn has_next_page(&self) -> bool {
        self.inner.store.snapshot().await.has_next_page()
    }

    pub async fn has_prev_page(&self) -> bool {
        self.inner.store.snapshot().await.has_prev_page()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
