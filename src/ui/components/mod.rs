pub mod chat_area;
pub mod input_bar;
pub mod sidebar;

use chrono::{DateTime, Local};

/// `HH:MM` in local time for an epoch-millisecond timestamp.
pub fn clock_label(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_label_is_hours_and_minutes() {
        let label = clock_label(1_700_000_000_000);
        assert_eq!(label.len(), 5);
        assert_eq!(&label[2..3], ":");
    }

    #[test]
    fn out_of_range_timestamp_has_no_label() {
        assert_eq!(clock_label(i64::MAX), "");
    }
}
