use std::net::IpAddr;

use colored::*;
use nmapviz_common::config::Viewport;
use nmapviz_common::network::device::{DeviceInfo, Network, UNKNOWN};
use nmapviz_core::selection::Selection;

use crate::terminal::{colors, map, print};
use nmapviz_common::warn;

type Detail = (String, ColoredString);

/// Closes a report: flags an empty result and a selection that matched
/// nothing. Returns the number of devices across `networks`.
pub fn conclude(networks: &[Network], selection: &Selection) -> usize {
    let host_count: usize = networks.iter().map(Network::len).sum();
    if host_count == 0 {
        print::header("zero hosts detected");
        print::no_results();
    }

    let selected: String = selection.get();
    if !selected.is_empty() {
        let found: bool = networks
            .iter()
            .flat_map(Network::devices)
            .any(|device| device.ip_address() == selected);
        if !found {
            warn!("selected device {selected} is not in any scanned network");
        }
    }

    host_count
}

/// Prints the map of `network` followed by one tree per device.
pub fn print_network(network: &Network, viewport: Viewport, selection: &Selection) {
    print::header(network.identifier());

    if network.is_empty() {
        print::print_status("no hosts up");
        return;
    }

    let devices: &[DeviceInfo] = network.devices();
    for line in map::plot(devices, viewport).render(devices, selection) {
        print::print(&line);
    }
    print::blank();

    for (idx, device) in devices.iter().enumerate() {
        print_device_tree(idx, device, selection);
        if idx + 1 != devices.len() {
            print::blank();
        }
    }
}

fn print_device_tree(idx: usize, device: &DeviceInfo, selection: &Selection) {
    print::tree_head(
        map::marker(idx),
        device.label(),
        selection.is_selected(device.ip_address()),
    );
    print::as_tree_one_level(device_details(device));
}

fn device_details(device: &DeviceInfo) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![ip_to_detail(device.ip_address())];

    if device.has_known_mac() {
        details.push(("MAC".to_string(), device.mac_address().color(colors::MAC_ADDR)));
    }
    if device.has_known_vendor() {
        details.push(("Vendor".to_string(), device.vendor().normal()));
    }
    if device.operating_system() != UNKNOWN {
        details.push(("OS".to_string(), device.operating_system().normal()));
    }

    let mut open_ports = device.open_ports().peekable();
    if open_ports.peek().is_none() {
        details.push(("Ports".to_string(), "none open".dimmed()));
    }
    for port in open_ports {
        details.push(("Port".to_string(), port.to_string().color(colors::PORT_OPEN)));
    }

    details
}

fn ip_to_detail(ip_address: &str) -> Detail {
    match ip_address.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => ("IPv4".to_string(), ip_address.color(colors::IPV4_ADDR)),
        Ok(IpAddr::V6(_)) => ("IPv6".to_string(), ip_address.color(colors::IPV6_ADDR)),
        Err(_) => ("IP".to_string(), ip_address.dimmed()),
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
