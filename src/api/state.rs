use std::sync::Arc;

use crate::{
    db::{MemoryStore, WardrobeStore},
    services::{StylingEngine, UploadStorage, DEFAULT_OUTFIT_LIMIT},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WardrobeStore>,
    pub engine: Arc<StylingEngine>,
    pub uploads: UploadStorage,
    /// Outfits returned when a request does not set `limit`
    pub outfit_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn WardrobeStore>, engine: StylingEngine, uploads: UploadStorage) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
            uploads,
            outfit_limit: DEFAULT_OUTFIT_LIMIT,
        }
    }

    pub fn with_outfit_limit(mut self, limit: usize) -> Self {
        self.outfit_limit = limit;
        self
    }

    /// In-memory state writing uploads under `upload_dir`
    pub fn in_memory(upload_dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            StylingEngine::default(),
            UploadStorage::new(upload_dir, 10 * 1024 * 1024),
        )
    }
}
