//! # Scan Target Model
//!
//! Turns what the user typed into individual scan targets.
//!
//! [`split_targets`] breaks a combined input string into tokens. Each token is
//! handed to the scanner verbatim; [`Target`] only classifies it so the
//! front-end can reject obvious typos and tell the user how many addresses a
//! scan covers. Supported shapes:
//! * A single IPv4/IPv6 address (host).
//! * An IPv4 range (e.g., `192.168.1.1-100`).
//! * A CIDR block (e.g., `192.168.1.0/24`).
//! * Anything else nmap understands (hostnames, octet ranges), passed through as named.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use pnet::ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};

use crate::network::range::Ipv4Range;

/// Splits a combined input string into individual targets.
///
/// Commas are tried first. When that yields at most one token the input is
/// split on whitespace instead, so both `"a, b"` and `"a b"` give two targets.
pub fn split_targets(input: &str) -> Vec<String> {
    let by_comma: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();

    if by_comma.len() > 1 {
        return by_comma;
    }

    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// A single address.
    Host { target_addr: IpAddr },
    /// An inclusive IPv4 range.
    Range { ipv4_range: Ipv4Range },
    /// A network in CIDR notation.
    Cidr { network: IpNetwork },
    /// A hostname or any other expression left for nmap to interpret.
    Named,
}

/// A single scan target, kept as typed alongside what it was recognised as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    text: String,
    kind: TargetKind,
}

impl Target {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &TargetKind {
        &self.kind
    }

    /// How many addresses the target covers, when that can be known up front.
    pub fn address_count(&self) -> Option<u64> {
        match &self.kind {
            TargetKind::Host { .. } => Some(1),
            TargetKind::Range { ipv4_range } => Some(ipv4_range.address_count()),
            TargetKind::Cidr { network } => {
                let host_bits: u32 = match network {
                    IpNetwork::V4(net) => 32 - u32::from(net.prefix()),
                    IpNetwork::V6(net) => 128 - u32::from(net.prefix()),
                };
                1u64.checked_shl(host_bits)
            }
            TargetKind::Named => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text: &str = s.trim();

        if text.is_empty() {
            return Err("empty target".to_string());
        }
        if text.starts_with('-') {
            return Err(format!("invalid target: {text} (looks like an option)"));
        }
        if text.contains(|c: char| c.is_whitespace() || c == ',') {
            return Err(format!("invalid target: {text} (split multiple targets first)"));
        }

        let kind: TargetKind = if let Some(kind) = parse_host(text) {
            kind
        } else if let Some(kind) = parse_cidr_range(text)? {
            kind
        } else if let Some(kind) = parse_ip_range(text)? {
            kind
        } else {
            TargetKind::Named
        };

        Ok(Self {
            text: text.to_string(),
            kind,
        })
    }
}

/// Parses a single IP address.
fn parse_host(s: &str) -> Option<TargetKind> {
    s.parse::<IpAddr>()
        .ok()
        .map(|target_addr| TargetKind::Host { target_addr })
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
///
/// Only claims the token when the part before the dash is a full IPv4
/// address, so hostnames with dashes and nmap octet ranges fall through.
fn parse_ip_range(s: &str) -> Result<Option<TargetKind>, String> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let Ok(start_addr) = start_str.parse::<Ipv4Addr>() else {
        return Ok(None);
    };

    let end_addr = parse_range_end_addr(end_str, &start_addr, s)?;
    if end_addr < start_addr {
        return Err(format!("Range ends before it starts: {s}"));
    }

    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    Ok(Some(TargetKind::Range { ipv4_range }))
}

/// Helper to parse the end address of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    range_str: &str,
) -> Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(format!("End range cannot be empty: {range_str}"));
    }

    let mut end_octets = start_addr.octets();
    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| format!("Invalid end range '{end_str}': {e}"))?;

    if partial_octets.len() > 4 {
        return Err(format!("End range has too many octets: {end_str}"));
    }

    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24" or "fd00::/64".
fn parse_cidr_range(s: &str) -> Result<Option<TargetKind>, String> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let Ok(ip) = ip_str.parse::<IpAddr>() else {
        return Ok(None);
    };

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| format!("Invalid prefix in CIDR '{prefix_str}': {e}"))?;

    let network: IpNetwork = match ip {
        IpAddr::V4(v4) => Ipv4Network::new(v4, prefix)
            .map(IpNetwork::V4)
            .map_err(|e| format!("Invalid CIDR '{s}': {e}"))?,
        IpAddr::V6(v6) => Ipv6Network::new(v6, prefix)
            .map(IpNetwork::V6)
            .map_err(|e| format!("Invalid CIDR '{s}': {e}"))?,
    };

    Ok(Some(TargetKind::Cidr { network }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
