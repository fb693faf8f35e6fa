//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binaries can prepare storage
//! without depending directly on `common`.

use std::path::Path;

/// Ensure the directory for the data file exists.
pub async fn ensure_env(data_file: &Path) -> anyhow::Result<()> {
    common::env::ensure_data_dir(data_file).await
}
