use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};
use tabled::Tabled;
use tracing::error;

/// Placeholder for metadata the OS does not report.
pub const UNKNOWN: &str = "unknown";

/// Metadata for one enumerable serial device.
///
/// Built fresh on every enumeration call; the `path` is only guaranteed
/// unique at the time of the call, not across device replug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct PortDescriptor {
    pub path: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub vendor_id: String,
    pub product_id: String,
}

impl From<SerialPortInfo> for PortDescriptor {
    fn from(info: SerialPortInfo) -> Self {
        match info.port_type {
            SerialPortType::UsbPort(usb) => Self {
                path: info.port_name,
                manufacturer: usb.manufacturer.unwrap_or_else(|| UNKNOWN.to_string()),
                serial_number: usb.serial_number.unwrap_or_else(|| UNKNOWN.to_string()),
                vendor_id: format!("{:04x}", usb.vid),
                product_id: format!("{:04x}", usb.pid),
            },
            // PCI, Bluetooth and unknown transports report no USB-style metadata
            _ => Self {
                path: info.port_name,
                manufacturer: UNKNOWN.to_string(),
                serial_number: UNKNOWN.to_string(),
                vendor_id: UNKNOWN.to_string(),
                product_id: UNKNOWN.to_string(),
            },
        }
    }
}

/// List serial devices reported by the host OS.
///
/// Never fails: an enumeration error is logged and an empty list returned,
/// since port listing is advisory. Order is whatever the OS reports.
pub fn list_ports() -> Vec<PortDescriptor> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(PortDescriptor::from).collect(),
        Err(e) => {
            error!("Failed to enumerate serial ports: {}", e);
            Vec::new()
        }
    }
}
