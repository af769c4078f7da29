//! Clock and duration text formats used in stored rows.

use crate::error::OvertimeError;

/// "HH:MM", zero padded.
pub fn format_clock(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// "{hours}h {minutes}m", hours unpadded and unbounded.
pub fn format_duration(total_minutes: u64) -> String {
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Parses "Xh Ym" or "Xh" back into minutes.
///
/// The literal `h` and `m` characters are dropped and the rest split on
/// whitespace: one token is hours, two are hours and minutes. Anything else,
/// including non-numeric tokens and totals past `u64::MAX` minutes, is a
/// malformed duration.
pub fn parse_duration(text: &str) -> Result<u64, OvertimeError> {
    let malformed = || OvertimeError::MalformedStoredDuration(text.to_string());

    let stripped: String = text.chars().filter(|c| *c != 'h' && *c != 'm').collect();
    let parts: Vec<&str> = stripped.split_whitespace().collect();

    let number = |s: &str| s.parse::<u64>().map_err(|_| malformed());

    let hours_to_minutes = |s: &str| number(s)?.checked_mul(60).ok_or_else(malformed);

    match parts.as_slice() {
        [hours] => hours_to_minutes(hours),
        [hours, minutes] => hours_to_minutes(hours)?
            .checked_add(number(minutes)?)
            .ok_or_else(malformed),
        _ => Err(malformed()),
    }
}
