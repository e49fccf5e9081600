use chrono::{Local, TimeZone};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Local time-of-day label for a message timestamp, e.g. "14:07".
pub fn clock_label(t_ms: i64) -> String {
    Local
        .timestamp_millis_opt(t_ms)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_ms_is_past_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn clock_label_is_hours_and_minutes() {
        let label = clock_label(now_ms());
        assert_eq!(label.len(), 5);
        assert_eq!(&label[2..3], ":");
    }
}
