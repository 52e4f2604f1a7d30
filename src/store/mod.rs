//! Application state
//!
//! Owned by the caller and passed by reference; nothing here is global.

pub mod activity;
pub mod documents;

pub use activity::{ActivityStore, Stats, StatsUpdate};
pub use documents::{sample_documents, DocumentFilters, DocumentStore};

/// Documents plus the activity feed
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub documents: DocumentStore,
    pub activity: ActivityStore,
}

impl AppState {
    /// State without seed data
    pub fn empty() -> Self {
        Self {
            documents: DocumentStore::with_documents(Vec::new()),
            activity: ActivityStore::empty(),
        }
    }
}
