use std::path::{Component, Path, PathBuf};

use axum::{body::Bytes, extract::State, Json};
use common::types::Message;
use serde::Deserialize;
use service::actress::import::read_import_file;
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

/// Optional body of `POST /import-json`.
#[derive(Debug, Default, Deserialize)]
pub struct ImportRequest {
    /// Bare file name, looked up next to the configured import file.
    #[serde(default)]
    pub path: Option<String>,
}

/// Bulk-import records from a JSON file, keeping their ids.
///
/// Reads the configured import file, or a sibling of it named by
/// `{"path": "<file name>"}`.
pub async fn import_json(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Message>, ApiError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        ImportRequest::default()
    } else {
        serde_json::from_slice::<ImportRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid import request: {e}")))?
    };
    let path = match req.path {
        Some(name) => resolve_import_path(&state.import_file, &name)?,
        None => state.import_file.clone(),
    };

    let records = read_import_file(&path).await?;
    let count = state.store.import_bulk(records).await?;
    info!(count, path = %path.display(), "import finished");
    Ok(Json(Message::new(format!("{count} actresses imported successfully."))))
}

/// Resolve `name` inside the directory of `configured`.
///
/// Only a single plain file name is accepted: no separators, no `..`, no
/// absolute paths.
fn resolve_import_path(configured: &Path, name: &str) -> Result<PathBuf, ApiError> {
    let requested = Path::new(name);
    let mut components = requested.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file)), None) => {
            let dir = configured.parent().unwrap_or_else(|| Path::new(""));
            Ok(dir.join(file))
        }
        _ => Err(ApiError::BadRequest(
            "import path must be a plain file name in the import directory".into(),
        )),
    }
}
