use chrono::Local;
use serde::{Deserialize, Serialize};

/// One decoded line received from the port, with receipt timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataEvent {
    /// Human-readable local time at which the line was framed
    pub timestamp: String,
    /// The line, trimmed of surrounding whitespace
    pub data: String,
}

impl DataEvent {
    /// Build an event stamped with the current local time.
    pub fn now(data: String, timestamp_format: &str) -> Self {
        Self {
            timestamp: Local::now().format(timestamp_format).to_string(),
            data,
        }
    }
}

/// An asynchronous transport-level failure notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEvent {
    pub message: String,
}

/// Push event emitted by an open session toward its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Data(DataEvent),
    Error(ErrorEvent),
}

/// Structured result of a session operation.
///
/// Every open/close/write call resolves to one of these; transport errors are
/// converted at the operation boundary rather than propagated, so hosts only
/// ever inspect `success` and render `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpOutcome {
    pub success: bool,
    pub message: String,
}

impl OpOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        let ok = OpOutcome::ok("done");
        assert!(ok.success);
        assert_eq!(ok.message, "done");

        let err = OpOutcome::err("nope");
        assert!(!err.success);
        assert_eq!(err.message, "nope");
    }

    #[test]
    fn test_data_event_timestamp_not_empty() {
        let event = DataEvent::now("line".to_string(), "%Y-%m-%d %H:%M:%S");
        assert!(!event.timestamp.is_empty());
        assert_eq!(event.data, "line");
    }

    #[test]
    fn test_event_json_shape() {
        let event = SessionEvent::Error(ErrorEvent {
            message: "device gone".to_string(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"error\""));
        assert!(json.contains("device gone"));
    }
}
