pub mod config;
pub mod debounce;
pub mod search;
pub mod store;

pub use config::{load_config, SearchConfig};
pub use debounce::Debouncer;
pub use search::api::{AlgoliaBackend, SearchBackend, SearchResponse, SearchResult};
pub use search::SearchSession;
pub use store::{reduce, SearchAction, SearchState, SearchStore};
