use async_trait::async_trait;
use calculator_sdk::{HistoryRecord, NewHistoryRecord};
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::repo::HistoryRepository;

/// Process-local history; lost on exit.
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    records: Mutex<Vec<HistoryRecord>>,
}

impl InMemoryHistoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<HistoryRecord> {
        let stored = HistoryRecord {
            id: Uuid::now_v7(),
            operator: record.operator,
            operand_a: record.operand_a,
            operand_b: record.operand_b,
            result: record.result,
            created_at: Utc::now(),
        };
        self.records.lock().push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> anyhow::Result<Vec<HistoryRecord>> {
        let mut records: Vec<HistoryRecord> = self.records.lock().iter().rev().cloned().collect();
        // stable: equal timestamps keep latest-insert-first
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn delete_all(&self) -> anyhow::Result<u64> {
        let removed = std::mem::take(&mut *self.records.lock()).len();
        Ok(u64::try_from(removed)?)
    }
}
