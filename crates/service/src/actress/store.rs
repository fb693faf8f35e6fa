use async_trait::async_trait;
use models::{Actress, ActressPatch, NewActress};

use crate::errors::ServiceError;

/// Storage contract for actress records.
///
/// Every successful mutation is durable before it returns.
#[async_trait]
pub trait ActressStore: Send + Sync {
    async fn list(&self) -> Vec<Actress>;
    async fn get(&self, id: u64) -> Result<Actress, ServiceError>;
    async fn create(&self, input: NewActress) -> Result<Actress, ServiceError>;
    async fn update(&self, id: u64, patch: ActressPatch) -> Result<Actress, ServiceError>;
    async fn delete(&self, id: u64) -> Result<(), ServiceError>;
    /// Insert fully formed records under their own ids; all or nothing.
    /// Returns how many were imported.
    async fn import_bulk(&self, records: Vec<Actress>) -> Result<usize, ServiceError>;
}
