use serde::{Deserialize, Serialize};

/// Linescope configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinescopeConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Baud rate used when none is given on the command line
    #[serde(default = "default_baud")]
    pub default_baud: u32,
    /// Capacity of the bounded session event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// strftime format for incoming data timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_baud() -> u32 {
    9600
}

fn default_event_buffer() -> usize {
    256
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for LinescopeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_baud: default_baud(),
            event_buffer: default_event_buffer(),
            timestamp_format: default_timestamp_format(),
        }
    }
}
