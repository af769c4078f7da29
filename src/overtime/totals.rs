use crate::error::OvertimeError;
use crate::model::overtime::{RowSummary, Totals};
use crate::store::Record;
use crate::utils::duration::parse_duration;

const AGENT: &str = "Agent Name";
const TOTAL_TIME: &str = "Total Time";

fn cell(record: &Record, key: &str) -> String {
    record.get(key).cloned().unwrap_or_default()
}

fn summarize(record: &Record, hours: String) -> RowSummary {
    RowSummary {
        date: cell(record, "Date"),
        from: cell(record, "From"),
        to: cell(record, "To"),
        hours,
        reason: cell(record, "Reason"),
        bonus: cell(record, "20k Bonus"),
        holiday: cell(record, "Holiday?"),
        overnight: cell(record, "Overnight?"),
    }
}

/// Sums every record whose agent cell equals `agent` exactly.
///
/// A single unparseable `Total Time`, or a sum that no longer fits in `u64`
/// minutes, fails the whole aggregate. A record with no `Total Time` key at
/// all counts as zero.
pub fn aggregate(agent: &str, records: &[Record]) -> Result<Totals, OvertimeError> {
    let mut minutes = 0u64;
    let mut rows = Vec::new();

    for record in records
        .iter()
        .filter(|r| r.get(AGENT).map(String::as_str) == Some(agent))
    {
        let hours = record
            .get(TOTAL_TIME)
            .cloned()
            .unwrap_or_else(|| "0h 0m".to_string());

        minutes = minutes
            .checked_add(parse_duration(&hours)?)
            .ok_or_else(|| OvertimeError::MalformedStoredDuration(hours.clone()))?;
        rows.push(summarize(record, hours));
    }

    Ok(Totals {
        total_hours: minutes / 60,
        total_minutes: minutes % 60,
        rows,
    })
}
