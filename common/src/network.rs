//! # Network Model
//!
//! * [`device`]: what a scan discovers (ports, devices, networks).
//! * [`target`]: what a scan is pointed at, and how user input is split into targets.
//! * [`range`]: inclusive IPv4 ranges used when sizing targets.

pub mod device;
pub mod range;
pub mod target;
