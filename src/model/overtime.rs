use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Column headers of the record table, in storage order.
pub const HEADERS: [&str; 9] = [
    "Agent Name",
    "Date",
    "From",
    "To",
    "Reason",
    "20k Bonus",
    "Holiday?",
    "Overnight?",
    "Total Time",
];

pub const DEFAULT_REASON: &str = "Scheduled OT";
pub const DEFAULT_BONUS: &str = "No";

/// A clock component as submitted. HTML forms post numbers as strings,
/// JSON clients post integers; both are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ClockValue {
    Int(i64),
    Text(String),
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[schema(example = json!({
    "agent": "Ana Martínez",
    "date": "2024-01-10",
    "from_hour": 18,
    "from_minute": 30,
    "to_hour": 21,
    "to_minute": 0,
    "reason": "Scheduled OT",
    "bonus": "No",
    "holiday": false,
    "overnight": false
}))]
pub struct OvertimeEntry {
    #[schema(example = "Ana Martínez")]
    pub agent: Option<String>,

    /// Free text, not checked against a calendar
    #[schema(example = "2024-01-10")]
    pub date: Option<String>,

    #[schema(value_type = Option<u32>, example = 18)]
    pub from_hour: Option<ClockValue>,
    #[schema(value_type = Option<u32>, example = 30)]
    pub from_minute: Option<ClockValue>,
    #[schema(value_type = Option<u32>, example = 21)]
    pub to_hour: Option<ClockValue>,
    #[schema(value_type = Option<u32>, example = 0)]
    pub to_minute: Option<ClockValue>,

    #[schema(example = "Scheduled OT")]
    pub reason: Option<String>,
    #[schema(example = "No")]
    pub bonus: Option<String>,
    /// Absent and `null` both mean `false`
    #[schema(example = false)]
    pub holiday: Option<bool>,
    #[schema(example = false)]
    pub overnight: Option<bool>,
}

/// The nine-cell row appended to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub agent: String,
    pub date: String,
    pub from: String,
    pub to: String,
    pub reason: String,
    pub bonus: String,
    pub holiday: String,
    pub overnight: String,
    pub total_time: String,
}

impl StoredRecord {
    /// Cell values in `HEADERS` order.
    pub fn cells(&self) -> [&str; 9] {
        [
            &self.agent,
            &self.date,
            &self.from,
            &self.to,
            &self.reason,
            &self.bonus,
            &self.holiday,
            &self.overnight,
            &self.total_time,
        ]
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TotalsQuery {
    #[schema(example = "Carlos López")]
    pub agent: Option<String>,

    /// Accepted for form compatibility; totals always cover every stored row.
    #[schema(example = "2024-01")]
    pub period: Option<String>,
}

/// One matched row as shown in the totals table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RowSummary {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Hours")]
    pub hours: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Bonus")]
    pub bonus: String,
    #[serde(rename = "Holiday")]
    pub holiday: String,
    #[serde(rename = "Overnight")]
    pub overnight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_hours: u64,
    pub total_minutes: u64,
    pub rows: Vec<RowSummary>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "message": "Record saved: Ana Martínez - 2h 30m"
}))]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "total_hours": 5,
    "total_minutes": 15,
    "rows": [{
        "Date": "2024-01-10",
        "From": "18:00",
        "To": "21:30",
        "Hours": "3h 30m",
        "Reason": "Scheduled OT",
        "Bonus": "No",
        "Holiday": "No",
        "Overnight": "No"
    }]
}))]
pub struct TotalsResponse {
    pub success: bool,
    pub total_hours: u64,
    pub total_minutes: u64,
    pub rows: Vec<RowSummary>,
}

impl From<Totals> for TotalsResponse {
    fn from(t: Totals) -> Self {
        Self {
            success: true,
            total_hours: t.total_hours,
            total_minutes: t.total_minutes,
            rows: t.rows,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "success": false,
    "error": "InvalidRange",
    "message": "End time must be after start time"
}))]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}
