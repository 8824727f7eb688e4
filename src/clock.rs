use chrono::{NaiveTime, Timelike};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockTimeError {
    #[error("clock time {0:?} is not valid 24-hour HH:MM")]
    InvalidFormat(String),
}

/// Parse a 24-hour "HH:MM" wall-clock value. Single-digit hours are
/// accepted ("7:30"), out-of-range components are not.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, ClockTimeError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ClockTimeError::InvalidFormat(value.to_string()))
}

/// Absolute gap in hours between two wall-clock times.
///
/// The gap is measured on the linear day, not the clock circle: 23:50 vs
/// 00:10 reports as ~23.67 hours even though the times are 20 minutes
/// apart across midnight. Callers that care about cross-midnight closeness
/// must handle the wrap themselves.
pub fn linear_gap_hours(a: NaiveTime, b: NaiveTime) -> f64 {
    let a_minutes = (a.hour() * 60 + a.minute()) as i64;
    let b_minutes = (b.hour() * 60 + b.minute()) as i64;
    (a_minutes - b_minutes).abs() as f64 / 60.0
}
