use std::path::Path;

use models::Actress;
use serde::Deserialize;
use tokio::fs;

use crate::errors::ServiceError;

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportSource {
    Records(Vec<Actress>),
    Snapshot { records: Vec<Actress> },
}

/// Parse an import payload: a JSON array of records, or a snapshot object
/// with a `records` array as written by the file store.
pub fn parse_import(bytes: &[u8]) -> Result<Vec<Actress>, ServiceError> {
    match serde_json::from_slice::<ImportSource>(bytes) {
        Ok(ImportSource::Records(records)) | Ok(ImportSource::Snapshot { records }) => Ok(records),
        Err(_) => {
            // untagged errors say nothing useful; report the plain array error
            let e = serde_json::from_slice::<Vec<Actress>>(bytes)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unrecognized import format".into());
            Err(ServiceError::Import(format!("invalid import data: {e}")))
        }
    }
}

/// Read and parse the import source at `path`.
pub async fn read_import_file(path: &Path) -> Result<Vec<Actress>, ServiceError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| ServiceError::Import(format!("cannot read {}: {e}", path.display())))?;
    parse_import(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_array() {
        let recs = parse_import(br#"[{"id": 4, "name": "Dee", "tags": ["x"]}]"#).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, 4);
        assert_eq!(recs[0].tags, vec!["x"]);
        assert!(recs[0].images.is_empty());
    }

    #[test]
    fn parses_snapshot_object() {
        let recs = parse_import(br#"{"last_id": 9, "records": [{"id": 9, "name": "Eve"}]}"#).unwrap();
        assert_eq!(recs[0].name, "Eve");
    }

    #[test]
    fn record_without_id_is_rejected() {
        let err = parse_import(br#"[{"name": "NoId"}]"#).unwrap_err();
        match err {
            ServiceError::Import(msg) => assert!(msg.contains("id"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse_import(b"nope"), Err(ServiceError::Import(_))));
    }

    #[tokio::test]
    async fn missing_file_is_import_error() {
        let path = std::env::temp_dir().join(format!("no_such_import_{}.json", uuid::Uuid::new_v4()));
        let err = read_import_file(&path).await.unwrap_err();
        assert!(matches!(err, ServiceError::Import(ref m) if m.contains("cannot read")));
    }
}
