use std::time::Duration;

use chrono::{DateTime, Local};

use super::category::Category;

/// Timestamp format used in the log and in todo annotations
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One expired timer
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    /// Configured duration at the moment of expiry
    pub duration: Duration,
    pub label: String,
    pub category: Category,
}

impl LogRecord {
    /// `2025-03-01 09:05:07 | 00:03:20 | label | red`
    pub fn line(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            format_hms(self.duration),
            self.label,
            self.category
        )
    }
}

/// Append-only completion log
#[derive(Debug, Clone, Default)]
pub struct CompletionLog {
    records: Vec<LogRecord>,
}

impl CompletionLog {
    pub fn append(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.records.iter().map(LogRecord::line)
    }
}

/// Format a duration as "HH:MM:SS", truncating sub-second parts
pub fn format_hms(d: Duration) -> String {
    let total_secs = d.as_secs();
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(label: &str, secs: u64) -> LogRecord {
        LogRecord {
            timestamp: Local.with_ymd_and_hms(2025, 3, 1, 9, 5, 7).unwrap(),
            duration: Duration::from_secs(secs),
            label: label.to_string(),
            category: Category::Red,
        }
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::ZERO), "00:00:00");
        assert_eq!(format_hms(Duration::from_secs(61)), "00:01:01");
        assert_eq!(format_hms(Duration::from_millis(3_661_900)), "01:01:01");
    }

    #[test]
    fn record_line_format() {
        insta::assert_snapshot!(record("Write report", 200).line(), @"2025-03-01 09:05:07 | 00:03:20 | Write report | red");
    }

    #[test]
    fn log_is_append_only_in_order() {
        let mut log = CompletionLog::default();
        assert!(log.is_empty());
        log.append(record("first", 60));
        log.append(record("second", 120));
        let lines: Vec<String> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("first"));
        assert!(lines[1].contains("00:02:00 | second"));
    }
}
