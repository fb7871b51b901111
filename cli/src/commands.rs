pub mod parse;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use nmapviz_common::config::{Config, DEFAULT_NMAP_PATH, Viewport};

#[derive(Parser)]
#[command(name = "nmapviz")]
#[command(about = "Runs nmap against many targets at once and maps what it finds.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output (repeat for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Highlight the device with this IP address
    #[arg(long, global = true, value_name = "IP")]
    pub select: Option<String>,

    /// Width of the map, in terminal columns
    #[arg(long, global = true, default_value_t = 64)]
    pub map_width: u16,

    /// Height of the map, in terminal rows
    #[arg(long, global = true, default_value_t = 21)]
    pub map_height: u16,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan one or more targets concurrently
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Map an nmap XML report saved to a file
    #[command(alias = "p")]
    Parse {
        file: PathBuf,
        /// Look up missing vendors in the bundled OUI database
        #[arg(long)]
        resolve_vendors: bool,
    },
}

#[derive(Args)]
pub struct ScanArgs {
    /// Hosts, IPv4 ranges or CIDR blocks; "a,b" and "a b" both work
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,

    /// Path to the nmap binary
    #[arg(long, default_value = DEFAULT_NMAP_PATH)]
    pub nmap_path: PathBuf,

    /// Option passed through to nmap, repeatable (e.g. --nmap-arg=-sV)
    #[arg(long = "nmap-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub nmap_args: Vec<String>,

    /// Run at most this many scans at the same time
    #[arg(short = 'j', long)]
    pub max_concurrent: Option<usize>,

    /// Milliseconds between progress checks
    #[arg(long, default_value_t = 500)]
    pub poll_ms: u64,

    /// Look up missing vendors in the bundled OUI database
    #[arg(long)]
    pub resolve_vendors: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(f64::from(self.map_width), f64::from(self.map_height))
    }
}

impl ScanArgs {
    pub fn to_config(&self, viewport: Viewport) -> Config {
        Config {
            nmap_path: self.nmap_path.clone(),
            nmap_args: self.nmap_args.clone(),
            max_concurrent_scans: self.max_concurrent,
            poll_interval: Duration::from_millis(self.poll_ms.max(1)),
            resolve_vendors: self.resolve_vendors,
            viewport,
        }
    }
}
