use std::sync::RwLock;

use async_trait::async_trait;

use super::{Record, RowStore, record_of};
use crate::error::OvertimeError;
use crate::model::overtime::StoredRecord;

/// Process-local table. Used by `STORE_BACKEND=memory` and by tests.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<StoredRecord>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn rows(&self) -> Vec<StoredRecord> {
        self.rows.read().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn append_row(&self, row: &StoredRecord) -> Result<(), OvertimeError> {
        self.rows
            .write()
            .map_err(|_| OvertimeError::StoreUnavailable("memory store poisoned".into()))?
            .push(row.clone());
        Ok(())
    }

    async fn all_records(&self) -> Result<Vec<Record>, OvertimeError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| OvertimeError::StoreUnavailable("memory store poisoned".into()))?;
        Ok(rows.iter().map(record_of).collect())
    }
}
