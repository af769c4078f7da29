use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::StreamExt;
use sqlx::MySqlPool;
use tracing::{error, info};

use super::{Record, RowStore};
use crate::error::OvertimeError;
use crate::model::overtime::{HEADERS, StoredRecord};

/// SQL column for each header, in `HEADERS` order.
const COLUMNS: [&str; 9] = [
    "agent_name",
    "date",
    "from_time",
    "to_time",
    "reason",
    "bonus",
    "holiday",
    "overnight",
    "total_time",
];

/// One MySQL table standing in for the worksheet. `id` keeps insertion order.
pub struct MySqlStore {
    pool: MySqlPool,
    table: String,
    ready: AtomicBool,
}

impl MySqlStore {
    /// `table` must already be a plain identifier; the config checks it.
    pub fn new(pool: MySqlPool, table: String) -> Self {
        Self {
            pool,
            table,
            ready: AtomicBool::new(false),
        }
    }

    fn create_sql(&self) -> String {
        let columns = COLUMNS
            .iter()
            .map(|c| format!("    {c} VARCHAR(255) NOT NULL"))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,\n{}\n)",
            self.table, columns
        )
    }

    fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; COLUMNS.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            COLUMNS.join(", "),
            placeholders
        )
    }

    fn select_sql(&self) -> String {
        format!("SELECT {} FROM {} ORDER BY id", COLUMNS.join(", "), self.table)
    }

    /// Creates the table on first use. Racing creators are harmless since the
    /// statement is idempotent.
    async fn ensure_table(&self) -> Result<(), OvertimeError> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        sqlx::query(&self.create_sql())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, table = %self.table, "Failed to create record table");
                OvertimeError::from(e)
            })?;

        info!(table = %self.table, "Record table ready");
        self.ready.store(true, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl RowStore for MySqlStore {
    async fn append_row(&self, row: &StoredRecord) -> Result<(), OvertimeError> {
        self.ensure_table().await?;

        let sql = self.insert_sql();
        let mut query = sqlx::query(&sql);
        for cell in row.cells() {
            query = query.bind(cell);
        }

        query.execute(&self.pool).await.map_err(|e| {
            error!(error = %e, agent = %row.agent, "Failed to append overtime row");
            OvertimeError::from(e)
        })?;
        Ok(())
    }

    async fn all_records(&self) -> Result<Vec<Record>, OvertimeError> {
        self.ensure_table().await?;

        let sql = self.select_sql();
        let mut stream = sqlx::query_as::<_, (String, String, String, String, String, String, String, String, String)>(&sql)
            .fetch(&self.pool);

        let mut records = Vec::new();
        while let Some(row) = stream.next().await {
            let (agent, date, from, to, reason, bonus, holiday, overnight, total) = row?;
            let cells = [agent, date, from, to, reason, bonus, holiday, overnight, total];
            records.push(
                HEADERS
                    .iter()
                    .zip(cells)
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            );
        }

        Ok(records)
    }
}
