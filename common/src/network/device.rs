//! # Discovered Topology
//!
//! The values produced by parsing a scan report.
//!
//! * [`Port`]: one probed port on a device.
//! * [`DeviceInfo`]: one discovered host.
//! * [`Network`]: the devices found by a single scan, under the identifier it was saved with.
//!
//! All three are immutable once built. Text fields the report did not provide
//! hold the [`UNKNOWN`] sentinel rather than being empty.

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

/// Sentinel stored in any text field the report left out.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    number: u16,
    protocol: String,
    state: String,
    service: String,
}

impl Port {
    /// A `number` of `0` marks a port id the report had but could not be read.
    pub fn new(
        number: u16,
        protocol: impl Into<String>,
        state: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            number,
            protocol: protocol.into(),
            state: state.into(),
            service: service.into(),
        }
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn is_open(&self) -> bool {
        self.state == "open"
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.number, self.protocol, self.state)?;
        if !self.service.is_empty() {
            write!(f, " {}", self.service)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    ip_address: String,
    mac_address: String,
    vendor: String,
    device_type: String,
    ports: Vec<Port>,
    operating_system: String,
}

impl DeviceInfo {
    /// Builds a device, substituting [`UNKNOWN`] for every empty text field.
    pub fn new(
        ip_address: impl Into<String>,
        mac_address: impl Into<String>,
        vendor: impl Into<String>,
        device_type: impl Into<String>,
        ports: Vec<Port>,
        operating_system: impl Into<String>,
    ) -> Self {
        Self {
            ip_address: or_unknown(ip_address.into()),
            mac_address: or_unknown(mac_address.into()),
            vendor: or_unknown(vendor.into()),
            device_type: or_unknown(device_type.into()),
            ports,
            operating_system: or_unknown(operating_system.into()),
        }
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn mac_address(&self) -> &str {
        &self.mac_address
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Taken from the first hostname the report lists for the device.
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Ports in the order the report listed them.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn operating_system(&self) -> &str {
        &self.operating_system
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|port| port.is_open())
    }

    pub fn has_known_ip(&self) -> bool {
        self.ip_address != UNKNOWN
    }

    pub fn has_known_mac(&self) -> bool {
        self.mac_address != UNKNOWN
    }

    pub fn has_known_vendor(&self) -> bool {
        self.vendor != UNKNOWN
    }

    /// Short name for drawing: the hostname when there is one, otherwise the IP.
    pub fn label(&self) -> &str {
        if self.device_type != UNKNOWN {
            &self.device_type
        } else {
            &self.ip_address
        }
    }

    /// Returns a copy of this device carrying `vendor`.
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = or_unknown(vendor.into());
        self
    }
}

fn or_unknown(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

/// The devices discovered by one scan.
///
/// Within a network every known IP address appears at most once; devices
/// whose IP is [`UNKNOWN`] are kept as they are since there is nothing to
/// compare them by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    identifier: String,
    devices: Vec<DeviceInfo>,
}

impl Network {
    /// Keeps the first device for each IP address and drops later repeats.
    pub fn new(identifier: impl Into<String>, devices: Vec<DeviceInfo>) -> Self {
        let identifier: String = identifier.into();
        let mut seen: HashSet<String> = HashSet::with_capacity(devices.len());
        let mut unique: Vec<DeviceInfo> = Vec::with_capacity(devices.len());

        for device in devices {
            if device.has_known_ip() && !seen.insert(device.ip_address.clone()) {
                warn!(
                    network = %identifier,
                    ip = %device.ip_address,
                    "dropping duplicate device"
                );
                continue;
            }
            unique.push(device);
        }

        Self {
            identifier,
            devices: unique,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
