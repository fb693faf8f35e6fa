use std::{path::PathBuf, sync::Arc};

use service::actress::ActressStore;

/// Shared handler state. The store is the only owner of record data.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ActressStore>,
    /// Default source for `POST /import-json`.
    pub import_file: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn ActressStore>, import_file: impl Into<PathBuf>) -> Self {
        Self { store, import_file: import_file.into() }
    }
}
