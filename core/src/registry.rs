//! # Network Registry
//!
//! The single store of discovered networks. Completed scans write into it and
//! renderers read from it, each through a shared [`Arc`](std::sync::Arc).
//!
//! One lock guards the whole collection and is held only while the
//! collection itself is touched: never while parsing, laying out, or waiting
//! on a scan.

use std::sync::{Mutex, MutexGuard, PoisonError};

use nmapviz_common::network::device::{DeviceInfo, Network};
use nmapviz_common::topology::TopologyView;

pub const DEFAULT_IDENTIFIER: &str = "default";

#[derive(Debug, Default)]
pub struct NetworkRegistry {
    networks: Mutex<Vec<Network>>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new network.
    ///
    /// Saving under an identifier that already exists adds a second entry;
    /// repeated scans of one target accumulate rather than merge.
    pub fn save(&self, devices: Vec<DeviceInfo>, identifier: &str) {
        self.insert(Network::new(identifier, devices));
    }

    /// Appends an already built network, with the same accumulate semantics as [`Self::save`].
    pub fn insert(&self, network: Network) {
        self.lock().push(network);
    }

    /// Devices of the first network saved under `identifier`, or an empty list.
    pub fn get(&self, identifier: &str) -> Vec<DeviceInfo> {
        self.lock()
            .iter()
            .find(|network| network.identifier() == identifier)
            .map(|network| network.devices().to_vec())
            .unwrap_or_default()
    }

    /// Copy of every network, taken under the lock.
    pub fn snapshot(&self) -> Vec<Network> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Writers only ever push whole networks, so a poisoned guard still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, Vec<Network>> {
        self.networks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TopologyView for NetworkRegistry {
    fn networks(&self) -> Vec<Network> {
        self.snapshot()
    }

    fn devices(&self, identifier: &str) -> Vec<DeviceInfo> {
        self.get(identifier)
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
