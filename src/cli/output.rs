use crate::cli::args::OutputFormat;
use crate::infrastructure::ports::PortDescriptor;
use std::io;
use tabled::Table;

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::LinescopeError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_ports(&self, ports: &[PortDescriptor]) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_ports(&self, ports: &[PortDescriptor]) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Text => {
                if ports.is_empty() {
                    println!("No serial ports found");
                }
                for port in ports {
                    println!("{}", port.path);
                    println!("  manufacturer: {}", port.manufacturer);
                    println!("  serial number: {}", port.serial_number);
                    println!("  vendor id: {}", port.vendor_id);
                    println!("  product id: {}", port.product_id);
                }
            }
            OutputFormat::Json => {
                let output = serde_json::to_string_pretty(ports)?;
                println!("{}", output);
            }
            OutputFormat::Table => {
                if !ports.is_empty() {
                    let table = Table::new(ports);
                    println!("{}", table);
                }
            }
        }
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        println!("{}", message);
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        eprintln!("Error: {}", error);
        Ok(())
    }
}
