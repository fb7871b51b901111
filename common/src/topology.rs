//! Read-only access to discovered networks for rendering layers.
//!
//! Renderers only ever see this trait, so swapping the drawing technology
//! never touches the coordinator or the parser.

use crate::network::device::{DeviceInfo, Network};

pub trait TopologyView: Send + Sync {
    /// Every saved network, copied at a single point in time.
    fn networks(&self) -> Vec<Network>;

    /// Devices of the first network saved under `identifier`, or none.
    fn devices(&self, identifier: &str) -> Vec<DeviceInfo>;
}
