//! Logging shorthands used across the workspace.
//!
//! They forward to `tracing`, so whichever subscriber the binary installs
//! decides how they are rendered.

/// Target used by [`success!`] so formatters can give it its own marker.
pub const SUCCESS_TARGET: &str = "nmapviz::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        tracing::info!($($arg)*)
    };
}

/// An `info` level event reporting that something finished well.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        tracing::info!(target: "nmapviz::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}
