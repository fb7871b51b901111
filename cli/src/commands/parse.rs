use std::path::Path;

use anyhow::Context;

use crate::terminal::{network_fmt, print};
use nmapviz_common::config::Config;
use nmapviz_common::network::device::DeviceInfo;
use nmapviz_common::success;
use nmapviz_core::registry::NetworkRegistry;
use nmapviz_core::report;
use nmapviz_core::selection::Selection;
use nmapviz_core::vendors::{MacOuiRepo, fill_missing_vendors};

pub async fn parse(file: &Path, cfg: &Config, selection: &Selection) -> anyhow::Result<()> {
    let raw_report: String = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("could not read {}", file.display()))?;

    let mut devices: Vec<DeviceInfo> = report::parse(&raw_report)
        .with_context(|| format!("{} is not a usable nmap XML report", file.display()))?;
    if cfg.resolve_vendors {
        devices = fill_missing_vendors(devices, &MacOuiRepo);
    }
    success!("read {} hosts from {}", devices.len(), file.display());

    let identifier: String = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let registry = NetworkRegistry::new();
    registry.save(devices, &identifier);

    let networks = registry.snapshot();
    for network in &networks {
        network_fmt::print_network(network, cfg.viewport, selection);
    }

    let host_count: usize = network_fmt::conclude(&networks, selection);
    print::fat_separator();
    print::aligned_line("Hosts", format!("{host_count} up"));
    Ok(())
}
