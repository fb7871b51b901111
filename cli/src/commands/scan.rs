use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::bail;
use colored::*;
use tracing::Span;

use crate::terminal::{colors, network_fmt, print, spinner};
use nmapviz_common::config::Config;
use nmapviz_common::network::target::{Target, split_targets};
use nmapviz_common::scanning::ScanRunner;
use nmapviz_common::vendors::VendorRepository;
use nmapviz_common::{error, info, success, warn};
use nmapviz_core::coordinator::{ScanCoordinator, ScanState};
use nmapviz_core::registry::NetworkRegistry;
use nmapviz_core::runner::NmapRunner;
use nmapviz_core::selection::Selection;
use nmapviz_core::vendors::MacOuiRepo;

/// nmap options that refuse to run without raw socket access.
const PRIVILEGED_OPTIONS: &[&str] = &["-O", "-sS", "-sU", "-sA", "-sW", "-sM", "-sN", "-sF", "-sX"];

/// What the polling loop has seen so far.
#[derive(Default)]
struct Progress {
    completed: usize,
    failed: usize,
    /// Registry entries already printed. The registry only ever appends.
    shown: usize,
}

pub async fn scan(raw_targets: &[String], cfg: &Config, selection: &Selection) -> anyhow::Result<()> {
    let targets: Vec<Target> = parse_targets(raw_targets);
    if targets.is_empty() {
        bail!("no valid targets given");
    }
    warn_if_unprivileged(cfg);

    let registry: Arc<NetworkRegistry> = Arc::new(NetworkRegistry::new());
    let runner: Arc<dyn ScanRunner> = Arc::new(NmapRunner::from_config(cfg));
    let vendors: Arc<dyn VendorRepository> = Arc::new(MacOuiRepo);
    let coordinator =
        ScanCoordinator::from_config(cfg, Arc::clone(&registry), runner, Some(vendors));

    for target in &targets {
        coordinator.add_scan(target.as_str(), target.as_str())?;
    }

    let span: Span = spinner::scan_span(targets.len());
    let guard = span.enter();

    let start_time: Instant = Instant::now();
    let progress: Progress = poll_until_done(&coordinator, cfg, selection, &span).await;

    drop(guard);
    drop(span);

    let host_count: usize = network_fmt::conclude(&registry.snapshot(), selection);
    print_summary(host_count, &progress, start_time.elapsed());

    if progress.completed == 0 {
        bail!("all {} scans failed", progress.failed);
    }
    Ok(())
}

fn parse_targets(raw_targets: &[String]) -> Vec<Target> {
    raw_targets
        .iter()
        .flat_map(|raw| split_targets(raw))
        .filter_map(|token| match token.parse::<Target>() {
            Ok(target) => {
                match target.address_count() {
                    Some(count) => info!("queueing {target} ({count} addresses)"),
                    None => info!("queueing {target}"),
                }
                Some(target)
            }
            Err(e) => {
                error!("skipping target '{token}': {e}");
                None
            }
        })
        .collect()
}

fn warn_if_unprivileged(cfg: &Config) {
    let needs_root: bool = cfg
        .nmap_args
        .iter()
        .any(|arg| PRIVILEGED_OPTIONS.contains(&arg.as_str()));

    if needs_root && !is_root::is_root() {
        warn!("some nmap options need root privileges; those scans will likely fail");
    }
}

/// Checks the coordinator every poll interval, printing networks as their scans land.
async fn poll_until_done(
    coordinator: &ScanCoordinator,
    cfg: &Config,
    selection: &Selection,
    span: &Span,
) -> Progress {
    let mut progress = Progress::default();
    let mut ticker = tokio::time::interval(cfg.poll_interval);

    loop {
        ticker.tick().await;

        if coordinator.check_progress() {
            drain_finished(coordinator, &mut progress);
            show_new_networks(coordinator.registry(), cfg, selection, &mut progress);
        }

        let active: usize = coordinator.active_count();
        spinner::report_scan_progress(span, active, progress.completed + progress.failed);
        if active == 0 {
            break;
        }
    }

    // A scan can finish between the last progress check and the active count.
    drain_finished(coordinator, &mut progress);
    show_new_networks(coordinator.registry(), cfg, selection, &mut progress);
    progress
}

fn drain_finished(coordinator: &ScanCoordinator, progress: &mut Progress) {
    for request in coordinator.clear_completed() {
        match request.state() {
            ScanState::Completed => {
                let hosts: usize = request.result().map_or(0, <[_]>::len);
                success!("{} finished: {} hosts up", request.target(), hosts);
                progress.completed += 1;
            }
            ScanState::Failed => {
                error!(
                    "{} failed: {}",
                    request.target(),
                    request.failure().unwrap_or("unknown error")
                );
                progress.failed += 1;
            }
            ScanState::Queued | ScanState::Running => {}
        }
    }
}

fn show_new_networks(
    registry: &NetworkRegistry,
    cfg: &Config,
    selection: &Selection,
    progress: &mut Progress,
) {
    let networks = registry.snapshot();
    for network in networks.iter().skip(progress.shown) {
        network_fmt::print_network(network, cfg.viewport, selection);
    }
    progress.shown = networks.len();
}

fn print_summary(host_count: usize, progress: &Progress, total_time: Duration) {
    print::fat_separator();
    if progress.failed > 0 {
        print::aligned_line("Failed", progress.failed.to_string().color(colors::FAILURE).bold());
    }

    let hosts: ColoredString = format!("{host_count} hosts up").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!(
        "{} of {} scans complete: {hosts} in {total_time}",
        progress.completed,
        progress.completed + progress.failed
    )
    .color(colors::TEXT_DEFAULT);
    print::centerln(&output.to_string());
}
