use std::{collections::HashSet, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use models::{actress::validate_name, Actress, ActressPatch, NewActress};
use tracing::info;

use crate::actress::store::ActressStore;
use crate::errors::ServiceError;
use crate::storage::{JsonRecordStore, Keyed};

impl Keyed for Actress {
    fn key(&self) -> u64 { self.id }
}

/// File storage: actresses persisted as one JSON snapshot.
#[derive(Clone)]
pub struct ActressFileStore {
    store: Arc<JsonRecordStore<Actress>>,
}

impl ActressFileStore {
    /// Load from `path`, creating an empty file if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonRecordStore::<Actress>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// Largest id ever assigned or imported.
    pub async fn high_water_mark(&self) -> u64 {
        self.store.last_id().await
    }
}

#[async_trait]
impl ActressStore for ActressFileStore {
    async fn list(&self) -> Vec<Actress> {
        self.store.list().await
    }

    async fn get(&self, id: u64) -> Result<Actress, ServiceError> {
        self.store.get(id).await.ok_or_else(|| ServiceError::not_found("Actress"))
    }

    async fn create(&self, input: NewActress) -> Result<Actress, ServiceError> {
        input.validate()?;
        let created = self
            .store
            .mutate(|records| {
                let rec = input.into_actress(records.next_id());
                records.insert(rec.clone());
                Ok(rec)
            })
            .await?;
        info!(actress_id = created.id, "actress created");
        Ok(created)
    }

    async fn update(&self, id: u64, patch: ActressPatch) -> Result<Actress, ServiceError> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        let updated = self
            .store
            .mutate(|records| {
                let existing = records.get_mut(id).ok_or_else(|| ServiceError::not_found("Actress"))?;
                patch.validate()?;
                existing.apply(patch);
                Ok(existing.clone())
            })
            .await?;
        info!(actress_id = id, "actress updated");
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.store
            .mutate(|records| {
                records.remove(id).map(|_| ()).ok_or_else(|| ServiceError::not_found("Actress"))
            })
            .await?;
        info!(actress_id = id, "actress deleted");
        Ok(())
    }

    async fn import_bulk(&self, incoming: Vec<Actress>) -> Result<usize, ServiceError> {
        if incoming.is_empty() {
            return Ok(0);
        }
        let count = incoming.len();
        self.store
            .mutate(|records| {
                let mut seen = HashSet::with_capacity(count);
                for rec in &incoming {
                    if rec.id == 0 {
                        return Err(ServiceError::Import("record id must be a positive integer".into()));
                    }
                    if validate_name(&rec.name).is_err() {
                        return Err(ServiceError::Import(format!("record {} has an empty name", rec.id)));
                    }
                    if !seen.insert(rec.id) {
                        return Err(ServiceError::Import(format!("duplicate id {} in import data", rec.id)));
                    }
                    if records.contains(rec.id) {
                        return Err(ServiceError::Import(format!("id {} already exists", rec.id)));
                    }
                }
                for rec in incoming {
                    records.insert(rec);
                }
                Ok(())
            })
            .await
            .map_err(|e| match e {
                ServiceError::Storage(cause) => ServiceError::Import(cause),
                other => other,
            })?;
        info!(count, "actresses imported");
        Ok(count)
    }
}
