use chrono::{Local, Utc};

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Local wall-clock time as `h:m:s`, 12-hour, no zero padding.
pub fn stamp() -> String {
    Local::now().format("%-I:%-M:%-S").to_string()
}
