use async_trait::async_trait;
use calculator_sdk::models::{HistoryRecord, NewHistoryRecord};

/// Append-only log of completed calculations.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Store a record; the repository assigns `id` and `created_at`.
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<HistoryRecord>;

    /// All records, newest first. Equal timestamps list the later insert first.
    async fn list(&self) -> anyhow::Result<Vec<HistoryRecord>>;

    /// Remove every record and return how many were removed.
    async fn delete_all(&self) -> anyhow::Result<u64>;
}
