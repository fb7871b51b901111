//! Drives the coordinator through the real process runner, with small shell
//! scripts standing in for the nmap binary.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use nmapviz_common::config::Config;
use nmapviz_core::coordinator::{ScanCoordinator, ScanState};
use nmapviz_core::registry::NetworkRegistry;
use nmapviz_core::runner::NmapRunner;

use crate::support::{report, wait_for_progress};

/// Writes an executable script into a fresh temp directory and returns its path.
fn fake_nmap(name: &str, body: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nmapviz-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let path = dir.join("nmap");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn coordinator_for(nmap_path: PathBuf, args: &[&str]) -> ScanCoordinator {
    let cfg = Config {
        nmap_path,
        nmap_args: args.iter().map(|arg| arg.to_string()).collect(),
        ..Config::default()
    };
    ScanCoordinator::from_config(
        &cfg,
        Arc::new(NetworkRegistry::new()),
        Arc::new(NmapRunner::from_config(&cfg)),
        None,
    )
}

#[tokio::test]
async fn report_on_stdout_is_saved() {
    let xml = report(&[("172.16.0.5", "00:50:56:AA:BB:CC")]);
    let nmap = fake_nmap("stdout", &format!("cat <<'XML'\n{xml}\nXML"));
    let coordinator = coordinator_for(nmap, &["-sV"]);

    let id = coordinator.add_scan("vm", "172.16.0.5").unwrap();
    wait_for_progress(&coordinator).await;

    assert_eq!(coordinator.request(id).unwrap().state(), ScanState::Completed);
    let devices = coordinator.registry().get("vm");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].mac_address(), "00:50:56:AA:BB:CC");
}

#[tokio::test]
async fn target_arrives_last_after_options() {
    // Echo the arguments back inside a hostname so the parser hands them over.
    let body = r#"echo "<nmaprun><host><address addr=\"10.9.9.9\" addrtype=\"ipv4\"/><hostnames><hostname name=\"$*\"/></hostnames></host></nmaprun>""#;
    let nmap = fake_nmap("args", body);
    let coordinator = coordinator_for(nmap, &["-T4", "-Pn"]);

    coordinator.add_scan("args", "10.9.9.9").unwrap();
    wait_for_progress(&coordinator).await;

    let devices = coordinator.registry().get("args");
    assert_eq!(devices[0].device_type(), "-oX - -T4 -Pn 10.9.9.9");
}

#[tokio::test]
async fn non_zero_exit_fails_with_stderr() {
    let nmap = fake_nmap("exit", "echo 'Failed to resolve \"nowhere\".' >&2\nexit 2");
    let coordinator = coordinator_for(nmap, &[]);

    let id = coordinator.add_scan("bad", "nowhere").unwrap();
    wait_for_progress(&coordinator).await;

    let request = coordinator.request(id).unwrap();
    assert_eq!(request.state(), ScanState::Failed);
    assert!(request.failure().unwrap().contains("Failed to resolve"));
    assert!(coordinator.registry().is_empty());
}

#[tokio::test]
async fn missing_binary_fails_the_scan() {
    let coordinator = coordinator_for(PathBuf::from("/nonexistent/nmapviz/nmap"), &[]);

    let id = coordinator.add_scan("gone", "10.0.0.1").unwrap();
    wait_for_progress(&coordinator).await;

    let request = coordinator.request(id).unwrap();
    assert_eq!(request.state(), ScanState::Failed);
    assert!(request.failure().unwrap().contains("/nonexistent/nmapviz/nmap"));
}
