use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Command line arguments for Linescope
#[derive(Parser, Debug)]
#[command(
    name = "linescope",
    version = env!("CARGO_PKG_VERSION"),
    about = "Serial Port Line Monitor",
    long_about = "Lists serial ports and monitors one port at a time, streaming newline-delimited data with timestamps and writing lines back out."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress logging output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available serial ports
    List,
    /// Open a port and stream incoming lines; stdin lines are written to the port
    Monitor {
        /// Serial port path
        #[arg(short, long)]
        port: String,
        /// Baud rate (configured default when omitted)
        #[arg(short, long)]
        baud: Option<u32>,
    },
    /// Open a port, send one line, and close
    Send {
        /// Data to send (a newline terminator is appended)
        data: String,
        /// Serial port path
        #[arg(short, long)]
        port: String,
        /// Baud rate (configured default when omitted)
        #[arg(short, long)]
        baud: Option<u32>,
    },
    /// Configuration management commands
    Config {
        /// Configuration subcommand
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Display version information
    Version,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Destination path (global config location when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}
