//! Overtime entry validation and per-agent totals.
//!
//! Both operations are stateless: a submit validates and appends exactly one
//! row, a totals query reads every row fresh from the store.

pub mod totals;
pub mod validator;

use tracing::{info, warn};

use crate::error::OvertimeError;
use crate::model::overtime::{OvertimeEntry, StoredRecord, Totals};
use crate::store::RowStore;

pub use totals::aggregate;
pub use validator::build_record;

#[derive(Debug)]
pub struct Submitted {
    pub record: StoredRecord,
    pub message: String,
}

/// Validates `entry` and appends it. Nothing is written when validation fails.
pub async fn submit_entry(
    store: &dyn RowStore,
    entry: &OvertimeEntry,
) -> Result<Submitted, OvertimeError> {
    let record = build_record(entry).inspect_err(|e| warn!(error = %e, "Rejected overtime entry"))?;

    store.append_row(&record).await?;

    info!(agent = %record.agent, total = %record.total_time, "Overtime entry stored");
    let message = format!("Record saved: {} - {}", record.agent, record.total_time);
    Ok(Submitted { record, message })
}

pub async fn get_totals(store: &dyn RowStore, agent: &str) -> Result<Totals, OvertimeError> {
    if agent.trim().is_empty() {
        return Err(OvertimeError::IncompleteInput("agent".to_string()));
    }

    let records = store.all_records().await?;
    aggregate(agent, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::overtime::ClockValue;
    use crate::store::memory::MemoryStore;

    fn shift(agent: &str, from: (i64, i64), to: (i64, i64)) -> OvertimeEntry {
        OvertimeEntry {
            agent: Some(agent.into()),
            date: Some("2024-01-10".into()),
            from_hour: Some(ClockValue::Int(from.0)),
            from_minute: Some(ClockValue::Int(from.1)),
            to_hour: Some(ClockValue::Int(to.0)),
            to_minute: Some(ClockValue::Int(to.1)),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn submit_appends_and_reports() {
        let store = MemoryStore::default();
        let done = submit_entry(&store, &shift("Ana Martínez", (18, 30), (21, 0)))
            .await
            .unwrap();

        assert_eq!(done.message, "Record saved: Ana Martínez - 2h 30m");
        assert_eq!(store.rows(), vec![done.record]);
    }

    #[actix_web::test]
    async fn rejected_entries_are_not_appended() {
        let store = MemoryStore::default();

        let err = submit_entry(&store, &shift("Ana", (9, 0), (9, 0)))
            .await
            .unwrap_err();
        assert_eq!(err, OvertimeError::InvalidRange);

        let mut incomplete = shift("Ana", (9, 0), (10, 0));
        incomplete.date = None;
        let err = submit_entry(&store, &incomplete).await.unwrap_err();
        assert_eq!(err, OvertimeError::IncompleteInput("date".into()));

        assert!(store.rows().is_empty());
    }

    #[actix_web::test]
    async fn totals_reflect_previous_submits() {
        let store = MemoryStore::default();
        for (from, to) in [((18, 0), (21, 30)), ((7, 15), (9, 0))] {
            submit_entry(&store, &shift("Carlos López", from, to))
                .await
                .unwrap();
        }
        submit_entry(&store, &shift("Ana Martínez", (8, 0), (9, 0)))
            .await
            .unwrap();

        let totals = get_totals(&store, "Carlos López").await.unwrap();
        assert_eq!((totals.total_hours, totals.total_minutes), (5, 15));
        assert_eq!(totals.rows.len(), 2);
    }

    #[actix_web::test]
    async fn totals_need_an_agent() {
        let store = MemoryStore::default();
        assert_eq!(
            get_totals(&store, " ").await,
            Err(OvertimeError::IncompleteInput("agent".into()))
        );
    }
}
