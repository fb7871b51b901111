use std::path::PathBuf;
use std::time::Duration;

#[cfg(windows)]
pub const DEFAULT_NMAP_PATH: &str = r"C:\Program Files (x86)\Nmap\nmap.exe";
#[cfg(not(windows))]
pub const DEFAULT_NMAP_PATH: &str = "nmap";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the nmap binary. A bare name is looked up in `PATH`.
    pub nmap_path: PathBuf,
    /// Extra options handed to nmap before the target, e.g. `-sV` or `-O`.
    pub nmap_args: Vec<String>,
    /// Upper bound on scans running at the same time.
    ///
    /// `None` lets every submitted scan start immediately.
    pub max_concurrent_scans: Option<usize>,
    /// How often the front-end asks the coordinator for progress.
    pub poll_interval: Duration,
    /// Fill in missing vendors from the OUI database when a MAC is known.
    pub resolve_vendors: bool,
    pub viewport: Viewport,
}

/// Drawing surface handed to the layout engine, in whatever unit the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(64.0, 21.0)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nmap_path: PathBuf::from(DEFAULT_NMAP_PATH),
            nmap_args: Vec::new(),
            max_concurrent_scans: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            resolve_vendors: false,
            viewport: Viewport::default(),
        }
    }
}
