use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::RwLock};
use tracing::{debug, info};

use crate::errors::ServiceError;

/// Records addressable by a store-assigned integer id.
pub trait Keyed {
    fn key(&self) -> u64;
}

/// In-memory image of the snapshot file.
///
/// `last_id` is the largest id ever handed out or imported. It only grows,
/// so ids of deleted records are never issued again.
#[derive(Clone, Debug)]
pub struct Records<V> {
    last_id: u64,
    items: BTreeMap<u64, V>,
}

impl<V: Keyed> Records<V> {
    fn from_items(last_id: u64, list: Vec<V>) -> Result<Self, String> {
        let mut items = BTreeMap::new();
        let mut high = last_id;
        for rec in list {
            let id = rec.key();
            high = high.max(id);
            if items.insert(id, rec).is_some() {
                return Err(format!("duplicate id {id}"));
            }
        }
        Ok(Self { last_id: high, items })
    }

    /// Reserve the next id: one past the high-water mark.
    pub fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Raise the high-water mark to at least `id`.
    pub fn observe_id(&mut self, id: u64) {
        self.last_id = self.last_id.max(id);
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&V> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut V> {
        self.items.get_mut(&id)
    }

    /// Insert keyed by `rec.key()`; returns the record it replaced.
    pub fn insert(&mut self, rec: V) -> Option<V> {
        let id = rec.key();
        self.observe_id(id);
        self.items.insert(id, rec)
    }

    pub fn remove(&mut self, id: u64) -> Option<V> {
        self.items.remove(&id)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<V> Default for Records<V> {
    fn default() -> Self {
        Self { last_id: 0, items: BTreeMap::new() }
    }
}

#[derive(Serialize)]
struct SnapshotOut<'a, V> {
    last_id: u64,
    records: Vec<&'a V>,
}

/// On-disk layouts accepted when loading.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotIn<V> {
    Snapshot {
        #[serde(default)]
        last_id: u64,
        records: Vec<V>,
    },
    /// Bare array of records, as the earlier file backend wrote it.
    Legacy(Vec<V>),
}

/// Generic JSON file-backed record store with id high-water mark.
///
/// Every mutation runs under the write lock against a working copy. The copy
/// is written to disk first and only then swapped in, so a failed write
/// leaves both memory and file as they were and readers never see a
/// half-applied change.
pub struct JsonRecordStore<V> {
    inner: RwLock<Records<V>>,
    file_path: PathBuf,
}

impl<V> JsonRecordStore<V>
where
    V: Keyed + Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Load the store from `path`. Creates the file with an empty snapshot if missing.
    ///
    /// An unreadable or corrupt file is an error rather than an empty store,
    /// since the next write would otherwise overwrite it.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let records = match fs::read(&file_path).await {
            Ok(bytes) => decode(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = Records::default();
                write_atomic(&file_path, &encode(&empty)?).await?;
                info!(path = %file_path.display(), "initialized empty record file");
                empty
            }
            Err(e) => {
                return Err(ServiceError::Storage(format!("{}: {e}", file_path.display())))
            }
        };
        debug!(
            path = %file_path.display(),
            count = records.len(),
            last_id = records.last_id(),
            "record file loaded"
        );

        Ok(Arc::new(Self { inner: RwLock::new(records), file_path }))
    }

    /// All records ordered by id.
    pub async fn list(&self) -> Vec<V> {
        let records = self.inner.read().await;
        records.items.values().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Option<V> {
        let records = self.inner.read().await;
        records.get(id).cloned()
    }

    pub async fn last_id(&self) -> u64 {
        self.inner.read().await.last_id()
    }

    /// Apply a mutation and persist it before it becomes visible.
    ///
    /// If `f` fails nothing is written. If the write fails the live state is
    /// untouched.
    pub async fn mutate<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Records<V>) -> Result<T, ServiceError>,
    {
        let mut live = self.inner.write().await;
        let mut working = live.clone();
        let out = f(&mut working)?;
        write_atomic(&self.file_path, &encode(&working)?).await?;
        *live = working;
        Ok(out)
    }
}

fn decode<V: Keyed + DeserializeOwned>(bytes: &[u8]) -> Result<Records<V>, String> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Records::default());
    }
    match serde_json::from_slice::<SnapshotIn<V>>(bytes).map_err(|e| e.to_string())? {
        SnapshotIn::Snapshot { last_id, records } => Records::from_items(last_id, records),
        SnapshotIn::Legacy(records) => Records::from_items(0, records),
    }
}

fn encode<V: Serialize>(records: &Records<V>) -> Result<Vec<u8>, ServiceError> {
    let out = SnapshotOut { last_id: records.last_id, records: records.items.values().collect() };
    serde_json::to_vec_pretty(&out).map_err(ServiceError::storage)
}

/// Write to a sibling temp file, fsync, rename over the target, then fsync
/// the directory so the rename itself is durable.
async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), ServiceError> {
    let tmp_path = path.with_extension("tmp");
    let fail = |stage: &str, e: std::io::Error| {
        ServiceError::Storage(format!("{stage} {}: {e}", tmp_path.display()))
    };

    let mut file = fs::File::create(&tmp_path).await.map_err(|e| fail("create", e))?;
    file.write_all(data).await.map_err(|e| fail("write", e))?;
    file.sync_all().await.map_err(|e| fail("sync", e))?;
    drop(file);

    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ServiceError::Storage(format!("rename to {}: {e}", path.display())))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir_file = fs::File::open(dir)
        .await
        .map_err(|e| ServiceError::Storage(format!("open {}: {e}", dir.display())))?;
    dir_file
        .sync_all()
        .await
        .map_err(|e| ServiceError::Storage(format!("sync {}: {e}", dir.display())))?;
    Ok(())
}
