//! Append-only row storage behind the overtime operations.
//!
//! A store holds one table whose header is [`HEADERS`]. Rows come back as
//! header → cell text maps in the order the store holds them.

pub mod credentials;
pub mod memory;
pub mod mysql;
pub mod sheets;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use strum_macros::{Display, EnumString};

use crate::config::Config;
use crate::error::OvertimeError;
use crate::model::overtime::{HEADERS, StoredRecord};

pub type Record = HashMap<String, String>;

#[async_trait]
pub trait RowStore: Send + Sync {
    async fn append_row(&self, row: &StoredRecord) -> Result<(), OvertimeError>;

    async fn all_records(&self) -> Result<Vec<Record>, OvertimeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Sheets,
    Mysql,
    Memory,
}

/// Pairs a header row with a data row, padding short rows with empty cells.
pub fn zip_header(header: &[String], cells: &[String]) -> Record {
    header
        .iter()
        .enumerate()
        .map(|(i, key)| (key.clone(), cells.get(i).cloned().unwrap_or_default()))
        .collect()
}

pub fn record_of(row: &StoredRecord) -> Record {
    HEADERS
        .iter()
        .zip(row.cells())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Builds the backend named in the config.
pub fn from_config(config: &Config) -> anyhow::Result<Arc<dyn RowStore>> {
    let store: Arc<dyn RowStore> = match config.store_backend {
        StoreBackend::Sheets => {
            let sheet_id = config
                .sheet_id
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GOOGLE_SHEET_ID must be set for the sheets backend"))?;
            Arc::new(sheets::SheetsStore::new(
                sheet_id,
                config.sheet_name.clone(),
                credentials::default_sources(&config.credentials_file),
            )
            .with_api_base(config.sheets_api_base.clone()))
        }
        StoreBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for the mysql backend"))?;
            let pool = crate::db::init_db(url)?;
            Arc::new(mysql::MySqlStore::new(pool, config.table_name.clone()))
        }
        StoreBackend::Memory => Arc::new(memory::MemoryStore::default()),
    };

    tracing::info!(backend = %config.store_backend, "Row store ready");
    Ok(store)
}
