use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use crate::search::api::{SearchResponse, SearchResult};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    pub is_searching: bool,
    pub error: String,
    pub text: String,
    pub response: SearchResponse,
}

impl SearchState {
    pub fn results(&self) -> &[SearchResult] {
        &self.response.hits
    }

    pub fn has_next_page(&self) -> bool {
        self.response.page + 1 < self.response.nb_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.response.page > 0
    }
}

#[derive(Clone, Debug)]
pub enum SearchAction {
    Clear,
    Start(String),
    Complete(SearchResponse),
    Error(String),
}

pub fn reduce(state: &SearchState, action: &SearchAction) -> SearchState {
    match action {
        SearchAction::Clear => SearchState::default(),

        SearchAction::Start(text) => SearchState {
            is_searching: true,
            error: String::new(),
            text: text.clone(),
            response: state.response.clone(),
        },

        SearchAction::Complete(response) => SearchState {
            is_searching: false,
            response: response.clone(),
            ..state.clone()
        },

        SearchAction::Error(message) => SearchState {
            is_searching: false,
            error: message.clone(),
            ..state.clone()
        },
    }
}

/// Single source of truth for the search UI. Transitions go through
/// `dispatch`; readers take a `snapshot` or `subscribe` for updates.
pub struct SearchStore {
    state: Arc<Mutex<SearchState>>,
    tx: watch::Sender<SearchState>,
}

impl SearchStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());
        Self {
            state: Arc::new(Mutex::new(SearchState::default())),
            tx,
        }
    }

    pub async fn dispatch(&self, action: SearchAction) -> SearchState {
        let mut guard = self.state.lock().await;
        let next = reduce(&guard, &action);
        debug!(
            "dispatch {}: is_searching={} page={} hits={}",
            action_label(&action),
            next.is_searching,
            next.response.page,
            next.response.hits.len()
        );
        *guard = next.clone();
        drop(guard);
        self.tx.send_replace(next.clone());
        next
    }

    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.tx.subscribe()
    }
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new()
    }
}

fn action_label(action: &SearchAction) -> &'static str {
    match action {
        SearchAction::Clear => "clear",
        SearchAction::Start(_) => "start",
        SearchAction::Complete(_) => "complete",
        SearchAction::Error(_) => "error",
    }
}
