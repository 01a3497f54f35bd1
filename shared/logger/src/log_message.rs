//! Internal log record.

use crate::log_level::LogLevel;
use chrono::Local;
use std::sync::Arc;

/// One formatted-on-demand log record travelling to the writer thread.
#[derive(Debug, Clone)]
pub(crate) struct LogMessage {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<Arc<str>>,
    pub message: String,
}

impl LogMessage {
    pub fn new(level: LogLevel, component: Option<Arc<str>>, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            component,
            message,
        }
    }

    /// `[timestamp] LEVEL [component: X]: message\n`
    pub fn format(&self) -> String {
        match self.component {
            Some(ref component) => format!(
                "[{}] {} [component: {}]: {}\n",
                self.timestamp, self.level, component, self.message
            ),
            None => format!("[{}] {}: {}\n", self.timestamp, self.level, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_component() {
        let msg = LogMessage::new(LogLevel::Error, None, "Device busy".to_string());
        let line = msg.format();
        assert!(line.contains("ERROR: Device busy"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_format_with_component() {
        let msg = LogMessage::new(
            LogLevel::Info,
            Some(Arc::from("Enumerator")),
            "2 devices".to_string(),
        );
        assert!(msg.format().contains("INFO [component: Enumerator]: 2 devices"));
    }

    #[test]
    fn test_timestamp_shape() {
        let msg = LogMessage::new(LogLevel::Debug, None, String::new());
        // YYYY-MM-DD HH:MM:SS.mmm
        assert_eq!(msg.timestamp.len(), 23);
        assert_eq!(&msg.timestamp[4..5], "-");
        assert_eq!(&msg.timestamp[19..20], ".");
    }
}
