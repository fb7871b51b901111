//! # nmapviz core
//!
//! Everything between "run nmap on this target" and "draw these devices".
//!
//! * **[`runner`]**: launches nmap and captures its XML report.
//! * **[`report`]**: turns an XML report into [`DeviceInfo`](nmapviz_common::network::device::DeviceInfo) records.
//! * **[`coordinator`]**: runs many scans at once and reports when they finish.
//! * **[`registry`]**: the shared store completed scans are saved into.
//! * **[`layout`]**: radial placement and hit testing for drawing a network.
//! * **[`selection`]**: the currently selected device.
//! * **[`vendors`]**: MAC vendor lookup backed by the bundled OUI database.

pub mod coordinator;
pub mod layout;
pub mod registry;
pub mod report;
pub mod runner;
pub mod selection;
pub mod vendors;
