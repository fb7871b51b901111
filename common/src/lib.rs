//! # nmapviz common
//!
//! Types shared by every crate in the workspace.
//!
//! * **[`network`]**: the discovered topology model and scan target handling.
//! * **[`error`]**: the error taxonomy for parsing and scan execution.
//! * **[`config`]**: runtime configuration assembled by the front-end.
//! * **[`scanning`]**, **[`vendors`]**, **[`topology`]**: traits implemented by
//!   `nmapviz-core` and consumed by whoever drives it.

pub mod config;
pub mod error;
pub mod macros;
pub mod network;
pub mod scanning;
pub mod topology;
pub mod vendors;
