use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::record::MatchRecord;
use crate::traits::MatchLogStore;

/// In-memory store. Records live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<u64, MatchRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchLogStore for MemoryStore {
    async fn next_match_id(&self) -> Result<u64, StorageError> {
        let records = self.records.read().await;
        Ok(records.keys().next_back().map_or(1, |last| last + 1))
    }

    async fn append(&self, record: MatchRecord) -> Result<(), StorageError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.match_id) {
            return Err(StorageError::DuplicateMatch {
                match_id: record.match_id,
            });
        }
        records.insert(record.match_id, record);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<MatchRecord>, StorageError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get(&self, match_id: u64) -> Result<MatchRecord, StorageError> {
        self.records
            .read()
            .await
            .get(&match_id)
            .cloned()
            .ok_or(StorageError::MatchNotFound { match_id })
    }
}
