use crate::error::OvertimeError;
use crate::model::overtime::{ClockValue, DEFAULT_BONUS, DEFAULT_REASON, OvertimeEntry, StoredRecord};
use crate::utils::duration::{format_clock, format_duration};

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// Names of required fields that are absent, in declaration order.
fn missing_fields(entry: &OvertimeEntry) -> Vec<&'static str> {
    let checks = [
        ("agent", blank(&entry.agent)),
        ("date", blank(&entry.date)),
        ("from_hour", entry.from_hour.is_none()),
        ("from_minute", entry.from_minute.is_none()),
        ("to_hour", entry.to_hour.is_none()),
        ("to_minute", entry.to_minute.is_none()),
    ];

    checks
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| name)
        .collect()
}

fn clock_part(
    field: &'static str,
    value: &Option<ClockValue>,
    max: u32,
) -> Result<u32, OvertimeError> {
    let invalid = |reason: String| OvertimeError::InvalidField { field, reason };

    let raw = match value {
        Some(ClockValue::Int(n)) => *n,
        Some(ClockValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("{s:?} is not a whole number")))?,
        None => return Err(OvertimeError::IncompleteInput(field.to_string())),
    };

    u32::try_from(raw)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| invalid(format!("{raw} is outside 0-{max}")))
}

/// Turns a submitted entry into the row that gets stored.
///
/// Start and end are same-day clock times; `overnight` is carried as a label
/// only and never wraps the end past midnight.
pub fn build_record(entry: &OvertimeEntry) -> Result<StoredRecord, OvertimeError> {
    let missing = missing_fields(entry);
    if !missing.is_empty() {
        return Err(OvertimeError::IncompleteInput(missing.join(", ")));
    }

    let from_hour = clock_part("from_hour", &entry.from_hour, 23)?;
    let from_minute = clock_part("from_minute", &entry.from_minute, 59)?;
    let to_hour = clock_part("to_hour", &entry.to_hour, 23)?;
    let to_minute = clock_part("to_minute", &entry.to_minute, 59)?;

    let from_minutes = i64::from(from_hour * 60 + from_minute);
    let to_minutes = i64::from(to_hour * 60 + to_minute);
    let total = to_minutes - from_minutes;
    if total <= 0 {
        return Err(OvertimeError::InvalidRange);
    }

    Ok(StoredRecord {
        agent: entry.agent.clone().unwrap_or_default(),
        date: entry.date.clone().unwrap_or_default(),
        from: format_clock(from_hour, from_minute),
        to: format_clock(to_hour, to_minute),
        reason: entry
            .reason
            .clone()
            .unwrap_or_else(|| DEFAULT_REASON.to_string()),
        bonus: entry.bonus.clone().unwrap_or_else(|| DEFAULT_BONUS.to_string()),
        holiday: yes_no(entry.holiday.unwrap_or(false)),
        overnight: yes_no(entry.overnight.unwrap_or(false)),
        total_time: format_duration(total as u64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(from: (i64, i64), to: (i64, i64)) -> OvertimeEntry {
        OvertimeEntry {
            agent: Some("Ana Martínez".into()),
            date: Some("2024-01-10".into()),
            from_hour: Some(ClockValue::Int(from.0)),
            from_minute: Some(ClockValue::Int(from.1)),
            to_hour: Some(ClockValue::Int(to.0)),
            to_minute: Some(ClockValue::Int(to.1)),
            ..Default::default()
        }
    }

    #[test]
    fn evening_shift_is_formatted() {
        let record = build_record(&entry((18, 30), (21, 0))).unwrap();

        assert_eq!(record.agent, "Ana Martínez");
        assert_eq!(record.date, "2024-01-10");
        assert_eq!(record.from, "18:30");
        assert_eq!(record.to, "21:00");
        assert_eq!(record.total_time, "2h 30m");
        assert_eq!(record.reason, "Scheduled OT");
        assert_eq!(record.bonus, "No");
        assert_eq!(record.holiday, "No");
        assert_eq!(record.overnight, "No");
    }

    #[test]
    fn supplied_metadata_is_kept() {
        let mut e = entry((6, 5), (7, 0));
        e.reason = Some("Coverage".into());
        e.bonus = Some("Yes".into());
        e.holiday = Some(true);
        e.overnight = Some(true);

        let record = build_record(&e).unwrap();
        assert_eq!(record.from, "06:05");
        assert_eq!(record.total_time, "0h 55m");
        assert_eq!(record.reason, "Coverage");
        assert_eq!(record.bonus, "Yes");
        assert_eq!(record.holiday, "Yes");
        assert_eq!(record.overnight, "Yes");
    }

    #[test]
    fn null_flags_mean_no() {
        let e: OvertimeEntry = serde_json::from_value(serde_json::json!({
            "agent": "Ana Martínez",
            "date": "2024-01-10",
            "from_hour": 18, "from_minute": 0,
            "to_hour": 19, "to_minute": 0,
            "holiday": null,
            "overnight": null
        }))
        .unwrap();

        let record = build_record(&e).unwrap();
        assert_eq!(record.holiday, "No");
        assert_eq!(record.overnight, "No");
    }

    #[test]
    fn zero_length_shift_is_rejected() {
        assert_eq!(
            build_record(&entry((9, 0), (9, 0))),
            Err(OvertimeError::InvalidRange)
        );
    }

    #[test]
    fn overnight_flag_does_not_wrap_midnight() {
        let mut e = entry((22, 0), (2, 0));
        e.overnight = Some(true);
        assert_eq!(build_record(&e), Err(OvertimeError::InvalidRange));
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let mut e = entry((9, 0), (10, 0));
        e.date = None;
        e.to_minute = None;
        e.agent = Some("   ".into());

        assert_eq!(
            build_record(&e),
            Err(OvertimeError::IncompleteInput("agent, date, to_minute".into()))
        );
    }

    #[test]
    fn missing_check_runs_before_range_check() {
        let mut e = entry((9, 0), (9, 0));
        e.from_hour = None;
        assert!(matches!(
            build_record(&e),
            Err(OvertimeError::IncompleteInput(_))
        ));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut e = entry((0, 0), (0, 0));
        e.from_hour = Some(ClockValue::Text("8".into()));
        e.from_minute = Some(ClockValue::Text("00".into()));
        e.to_hour = Some(ClockValue::Text(" 17 ".into()));
        e.to_minute = Some(ClockValue::Text("15".into()));

        let record = build_record(&e).unwrap();
        assert_eq!(record.from, "08:00");
        assert_eq!(record.to, "17:15");
        assert_eq!(record.total_time, "9h 15m");
    }

    #[test]
    fn out_of_range_and_garbage_clock_values() {
        let e = entry((24, 0), (25, 0));
        assert!(matches!(
            build_record(&e),
            Err(OvertimeError::InvalidField { field: "from_hour", .. })
        ));

        let mut e = entry((9, 0), (10, 0));
        e.to_minute = Some(ClockValue::Int(-1));
        assert!(matches!(
            build_record(&e),
            Err(OvertimeError::InvalidField { field: "to_minute", .. })
        ));

        let mut e = entry((9, 0), (10, 0));
        e.from_minute = Some(ClockValue::Text("half past".into()));
        assert!(matches!(
            build_record(&e),
            Err(OvertimeError::InvalidField { field: "from_minute", .. })
        ));
    }

    proptest! {
        #[test]
        fn total_time_matches_minute_difference(
            fh in 0i64..24, fm in 0i64..60, th in 0i64..24, tm in 0i64..60,
        ) {
            let from = fh * 60 + fm;
            let to = th * 60 + tm;
            let result = build_record(&entry((fh, fm), (th, tm)));

            if to > from {
                let diff = to - from;
                let record = result.unwrap();
                prop_assert_eq!(record.total_time, format!("{}h {}m", diff / 60, diff % 60));
            } else {
                prop_assert_eq!(result, Err(OvertimeError::InvalidRange));
            }
        }
    }
}
