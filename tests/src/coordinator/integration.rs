use std::sync::Arc;
use std::time::Duration;

use nmapviz_common::error::SubmitError;
use nmapviz_core::coordinator::ScanState;

use crate::support::{
    Script, ScriptedRunner, coordinator, quick, report, wait_for_calls, wait_for_progress,
    wait_until_idle,
};

/// A freshly submitted scan is counted as active before anything has run.
#[tokio::test]
async fn submitted_scan_is_active_immediately() {
    let runner = Arc::new(ScriptedRunner::new().with("10.0.0.1", quick(report(&[("10.0.0.1", "")]))));
    let coordinator = coordinator(runner);

    let id = coordinator.add_scan("lab", "10.0.0.1").unwrap();

    assert!(coordinator.active_count() >= 1);
    let request = coordinator.request(id).unwrap();
    assert!(request.state().is_active());
    assert_eq!(request.target(), "10.0.0.1");
    assert_eq!(request.identifier(), "lab");
}

/// One completion is reported once: the next check sees nothing new.
#[tokio::test]
async fn progress_is_reported_exactly_once() {
    let runner = Arc::new(ScriptedRunner::new().with("10.0.0.1", quick(report(&[("10.0.0.1", "")]))));
    let coordinator = coordinator(runner);

    coordinator.add_scan("lab", "10.0.0.1").unwrap();
    wait_for_progress(&coordinator).await;

    assert!(!coordinator.check_progress());
    assert_eq!(coordinator.active_count(), 0);
}

/// Once progress is reported, the registry already holds the parsed devices.
#[tokio::test]
async fn completed_scan_is_visible_in_registry() {
    let xml = report(&[("192.168.1.10", "AA:BB:CC:00:11:22"), ("192.168.1.20", "")]);
    let runner = Arc::new(ScriptedRunner::new().with("192.168.1.0/24", quick(xml)));
    let coordinator = coordinator(runner);

    let id = coordinator.add_scan("home", "192.168.1.0/24").unwrap();
    wait_for_progress(&coordinator).await;

    let devices = coordinator.registry().get("home");
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].ip_address(), "192.168.1.10");
    assert_eq!(devices[0].mac_address(), "AA:BB:CC:00:11:22");
    assert_eq!(devices[0].open_ports().count(), 1);
    assert_eq!(devices[1].mac_address(), "Unknown");

    let request = coordinator.request(id).unwrap();
    assert_eq!(request.state(), ScanState::Completed);
    assert_eq!(request.result().map(<[_]>::len), Some(2));
}

/// Clearing drops exactly the finished requests and leaves running ones alone.
#[tokio::test]
async fn clear_completed_keeps_running_scans() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .with("10.0.0.1", quick(report(&[("10.0.0.1", "")])))
            .with("10.0.0.2", Script::Fail { delay: Duration::from_millis(10), code: 1 })
            .with("10.0.0.3", Script::Gated { xml: report(&[("10.0.0.3", "")]) }),
    );
    let coordinator = coordinator(runner.clone());

    coordinator.add_scan("a", "10.0.0.1").unwrap();
    coordinator.add_scan("b", "10.0.0.2").unwrap();
    let gated = coordinator.add_scan("c", "10.0.0.3").unwrap();

    tokio::time::timeout(crate::support::WAIT_LIMIT, async {
        while coordinator.active_count() > 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let before = coordinator.len();
    let terminal = coordinator
        .requests()
        .iter()
        .filter(|request| request.state().is_terminal())
        .count();
    assert_eq!(terminal, 2);

    assert_eq!(coordinator.clear_completed().len(), terminal);
    assert_eq!(coordinator.len(), before - terminal);
    assert_eq!(coordinator.requests()[0].id(), gated);

    runner.release();
    wait_until_idle(&coordinator).await;
    assert_eq!(coordinator.clear_completed().len(), 1);
    assert!(coordinator.is_empty());
}

/// A scan that finishes between a look at the table and a clear is still
/// handed back by the clear.
#[tokio::test]
async fn scan_finishing_before_clear_is_returned_by_it() {
    let runner = Arc::new(
        ScriptedRunner::new().with("10.0.0.7", Script::Gated { xml: report(&[("10.0.0.7", "")]) }),
    );
    let coordinator = coordinator(runner.clone());
    let id = coordinator.add_scan("late", "10.0.0.7").unwrap();
    wait_for_calls(&runner, 1).await;

    let seen_terminal = coordinator
        .requests()
        .iter()
        .filter(|request| request.state().is_terminal())
        .count();
    assert_eq!(seen_terminal, 0);

    runner.release();
    wait_for_progress(&coordinator).await;

    let cleared = coordinator.clear_completed();
    assert_eq!(cleared.len(), 1);
    assert_eq!(cleared[0].id(), id);
    assert_eq!(cleared[0].state(), ScanState::Completed);
    assert_eq!(cleared[0].result().map(<[_]>::len), Some(1));
    assert!(coordinator.is_empty());
}

/// Devices reported for a request are the ones the registry holds.
#[tokio::test]
async fn duplicate_hosts_are_dropped_from_result_and_registry_alike() {
    let xml = report(&[("10.0.3.1", ""), ("10.0.3.2", ""), ("10.0.3.1", "")]);
    let runner = Arc::new(ScriptedRunner::new().with("10.0.3.0/30", quick(xml)));
    let coordinator = coordinator(runner);

    let id = coordinator.add_scan("dupes", "10.0.3.0/30").unwrap();
    wait_for_progress(&coordinator).await;

    let saved = coordinator.registry().get("dupes");
    assert_eq!(saved.len(), 2);
    assert_eq!(coordinator.request(id).unwrap().result(), Some(saved.as_slice()));
}

/// A short scan submitted after a long one still finishes first.
#[tokio::test]
async fn faster_scan_completes_first() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .with(
                "slow.example",
                Script::Report {
                    delay: Duration::from_millis(300),
                    xml: report(&[("10.0.1.1", "")]),
                },
            )
            .with(
                "fast.example",
                Script::Report {
                    delay: Duration::from_millis(20),
                    xml: report(&[("10.0.2.1", "")]),
                },
            ),
    );
    let coordinator = coordinator(runner.clone());

    let slow = coordinator.add_scan("slow", "slow.example").unwrap();
    let fast = coordinator.add_scan("fast", "fast.example").unwrap();

    wait_for_progress(&coordinator).await;
    assert_eq!(coordinator.request(fast).unwrap().state(), ScanState::Completed);
    assert!(coordinator.request(slow).unwrap().state().is_active());
    assert_eq!(coordinator.registry().get("fast").len(), 1);
    assert!(coordinator.registry().get("slow").is_empty());

    wait_until_idle(&coordinator).await;
    assert_eq!(runner.finish_order(), vec!["fast.example", "slow.example"]);
}

/// A failing scan is recorded but never reaches the registry.
#[tokio::test]
async fn failed_scan_leaves_registry_untouched() {
    let runner = Arc::new(
        ScriptedRunner::new().with("nowhere.invalid", Script::Fail { delay: Duration::ZERO, code: 1 }),
    );
    let coordinator = coordinator(runner);

    let id = coordinator.add_scan("bad", "nowhere.invalid").unwrap();
    wait_for_progress(&coordinator).await;

    let request = coordinator.request(id).unwrap();
    assert_eq!(request.state(), ScanState::Failed);
    assert!(request.result().is_none());
    assert!(request.failure().unwrap().contains("Failed to resolve target"));
    assert!(coordinator.registry().is_empty());
}

/// Output that is not a report fails the scan rather than saving an empty network.
#[tokio::test]
async fn malformed_report_fails_the_scan() {
    let runner = Arc::new(
        ScriptedRunner::new().with("10.0.0.9", quick("<nmaprun><host>".to_string())),
    );
    let coordinator = coordinator(runner);

    let id = coordinator.add_scan("broken", "10.0.0.9").unwrap();
    wait_for_progress(&coordinator).await;

    assert_eq!(coordinator.request(id).unwrap().state(), ScanState::Failed);
    assert!(coordinator.registry().get("broken").is_empty());
}

#[tokio::test]
async fn empty_target_is_rejected_without_tracking() {
    let coordinator = coordinator(Arc::new(ScriptedRunner::new()));

    assert_eq!(coordinator.add_scan("x", ""), Err(SubmitError::EmptyTarget));
    assert!(coordinator.is_empty());
    assert_eq!(coordinator.active_count(), 0);
}

/// Many scans at once: every one finishes and every success is saved.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_concurrent_scans_all_land() -> anyhow::Result<()> {
    let mut runner = ScriptedRunner::new();
    for i in 0..20 {
        let target = format!("10.1.{i}.0/30");
        let ip = format!("10.1.{i}.1");
        runner = runner.with(&target, quick(report(&[(ip.as_str(), "")])));
    }
    let runner = Arc::new(runner);
    let coordinator = coordinator(runner.clone());

    for i in 0..20 {
        coordinator.add_scan(&format!("net-{i}"), &format!("10.1.{i}.0/30"))?;
    }
    wait_for_calls(&runner, 20).await;
    wait_until_idle(&coordinator).await;

    assert!(coordinator.check_progress());
    assert_eq!(coordinator.registry().len(), 20);
    assert_eq!(coordinator.clear_completed().len(), 20);
    for i in 0..20 {
        let devices = coordinator.registry().get(&format!("net-{i}"));
        assert_eq!(devices[0].ip_address(), format!("10.1.{i}.1"));
    }
    Ok(())
}
