//! # Scan Report Parser
//!
//! Turns nmap's XML report (`-oX`) into [`DeviceInfo`] values, one per
//! `<host>` record, in document order.
//!
//! The document is read in a single streaming pass. Only a document that is
//! not well-formed (or has no root element) fails the call, and that includes
//! broken attributes and text around the root; anything missing
//! or unreadable inside a host record just leaves that field at its
//! `"Unknown"` sentinel, and an unreadable port id becomes port `0`.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, trace};

use nmapviz_common::error::ParseError;
use nmapviz_common::network::device::{DeviceInfo, Port};

/// Parses a raw report into the devices it describes.
///
/// No partial results are returned: on error the caller gets nothing.
pub fn parse(raw_report: &str) -> Result<Vec<DeviceInfo>, ParseError> {
    let mut reader = Reader::from_str(raw_report);
    reader.config_mut().trim_text(true);

    let mut walker = ReportWalker::default();
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Xml {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(element) => {
                let position = reader.buffer_position() as u64;
                if open.is_empty() {
                    enter_root(&mut seen_root, position)?;
                }
                check_attributes(&element, position)?;
                let name: String = element_name(&element);
                walker.open(&name, &element, &open);
                open.push(name);
            }
            Event::Empty(element) => {
                let position = reader.buffer_position() as u64;
                if open.is_empty() {
                    enter_root(&mut seen_root, position)?;
                }
                check_attributes(&element, position)?;
                let name: String = element_name(&element);
                walker.open(&name, &element, &open);
                walker.close(&name, &open);
            }
            Event::End(_) => {
                if let Some(name) = open.pop() {
                    walker.close(&name, &open);
                }
            }
            Event::Text(text) if open.is_empty() => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(stray_content(reader.buffer_position() as u64));
                }
            }
            Event::CData(_) if open.is_empty() => {
                return Err(stray_content(reader.buffer_position() as u64));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(ParseError::UnclosedElement { name });
    }
    if !seen_root {
        return Err(ParseError::MissingRoot);
    }

    debug!(hosts = walker.devices.len(), "parsed scan report");
    Ok(walker.devices)
}

fn enter_root(seen_root: &mut bool, position: u64) -> Result<(), ParseError> {
    if *seen_root {
        return Err(ParseError::Xml {
            position,
            message: "more than one root element".to_string(),
        });
    }
    *seen_root = true;
    Ok(())
}

/// Character data is only allowed inside the root element.
fn stray_content(position: u64) -> ParseError {
    ParseError::Xml {
        position,
        message: "text outside the root element".to_string(),
    }
}

/// Rejects unquoted, duplicated or badly escaped attributes.
fn check_attributes(element: &BytesStart, position: u64) -> Result<(), ParseError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ParseError::Xml {
            position,
            message: e.to_string(),
        })?;
        attr.unescape_value().map_err(|e| ParseError::Xml {
            position,
            message: e.to_string(),
        })?;
    }
    Ok(())
}

/// Collects host records while the document is being read.
#[derive(Default)]
struct ReportWalker {
    devices: Vec<DeviceInfo>,
    host: Option<HostRecord>,
    port: Option<PortRecord>,
}

#[derive(Default)]
struct HostRecord {
    ip_address: String,
    mac_address: String,
    vendor: String,
    device_type: String,
    ports: Vec<Port>,
    operating_system: String,
}

#[derive(Default)]
struct PortRecord {
    number: u16,
    protocol: String,
    state: String,
    service: String,
}

impl ReportWalker {
    /// Handles an opening (or self-closing) tag. `open` holds its ancestors.
    fn open(&mut self, name: &str, element: &BytesStart, open: &[String]) {
        let parent: &str = open.last().map(String::as_str).unwrap_or_default();

        if name == "host" && open.len() == 1 {
            self.host = Some(HostRecord::default());
            return;
        }

        let Some(host) = self.host.as_mut() else {
            return;
        };

        match (parent, name) {
            ("host", "address") => read_address(host, element),
            ("hostnames", "hostname") => {
                if host.device_type.is_empty() {
                    host.device_type = attribute(element, b"name").unwrap_or_default();
                }
            }
            ("ports", "port") => {
                self.port = Some(PortRecord {
                    number: read_port_number(element),
                    protocol: attribute(element, b"protocol").unwrap_or_default(),
                    ..PortRecord::default()
                });
            }
            ("port", "state") => {
                if let Some(port) = self.port.as_mut() {
                    port.state = attribute(element, b"state").unwrap_or_default();
                }
            }
            ("port", "service") => {
                if let Some(port) = self.port.as_mut() {
                    port.service = describe_service(element);
                }
            }
            ("os", "osmatch") => {
                if host.operating_system.is_empty() {
                    host.operating_system = attribute(element, b"name").unwrap_or_default();
                }
            }
            _ => {}
        }
    }

    /// Handles the end of an element. `open` holds its ancestors.
    fn close(&mut self, name: &str, open: &[String]) {
        match name {
            "port" => {
                if let (Some(port), Some(host)) = (self.port.take(), self.host.as_mut()) {
                    host.ports
                        .push(Port::new(port.number, port.protocol, port.state, port.service));
                }
            }
            "host" if open.len() == 1 => {
                if let Some(host) = self.host.take() {
                    trace!(ip = %host.ip_address, ports = host.ports.len(), "host record");
                    self.devices.push(DeviceInfo::new(
                        host.ip_address,
                        host.mac_address,
                        host.vendor,
                        host.device_type,
                        host.ports,
                        host.operating_system,
                    ));
                }
            }
            _ => {}
        }
    }
}

fn read_address(host: &mut HostRecord, element: &BytesStart) {
    let Some(addr) = attribute(element, b"addr") else {
        return;
    };

    match attribute(element, b"addrtype").as_deref() {
        Some("ipv4") | Some("ipv6") => {
            if host.ip_address.is_empty() {
                host.ip_address = addr;
            }
        }
        Some("mac") => {
            if host.mac_address.is_empty() {
                host.mac_address = addr;
                host.vendor = attribute(element, b"vendor").unwrap_or_default();
            }
        }
        _ => {}
    }
}

fn read_port_number(element: &BytesStart) -> u16 {
    let raw: String = attribute(element, b"portid").unwrap_or_default();
    match raw.parse::<u16>() {
        Ok(number) => number,
        Err(e) => {
            debug!(portid = %raw, "unreadable port id, keeping port as 0: {e}");
            0
        }
    }
}

/// Builds the service description in a fixed order:
/// `name (product version) extrainfo [os:ostype]`.
///
/// Without a name the product becomes the base, followed by the version.
fn describe_service(element: &BytesStart) -> String {
    let mut service: String = attribute(element, b"name").unwrap_or_default();

    if let Some(product) = attribute(element, b"product") {
        let version: Option<String> = attribute(element, b"version");
        if service.is_empty() {
            service = product;
            if let Some(version) = version {
                service.push(' ');
                service.push_str(&version);
            }
        } else {
            service.push_str(" (");
            service.push_str(&product);
            if let Some(version) = version {
                service.push(' ');
                service.push_str(&version);
            }
            service.push(')');
        }
    }

    if let Some(extra) = attribute(element, b"extrainfo") {
        push_token(&mut service, &extra);
    }

    if let Some(os_type) = attribute(element, b"ostype") {
        push_token(&mut service, &format!("[os:{os_type}]"));
    }

    service
}

fn push_token(text: &mut String, token: &str) {
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(token);
}

/// Reads one attribute; empty values count as absent.
///
/// Attributes were already checked by [`check_attributes`].
fn attribute(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
        .filter(|value| !value.is_empty())
}

fn element_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
