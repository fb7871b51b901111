use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nmapviz_common::error::ScanExecutionError;
use nmapviz_common::scanning::ScanRunner;
use nmapviz_core::coordinator::ScanCoordinator;
use nmapviz_core::registry::NetworkRegistry;
use tokio::sync::Semaphore;

pub const WAIT_LIMIT: Duration = Duration::from_secs(5);
const POLL_STEP: Duration = Duration::from_millis(5);

/// What the fake scanner does for one target.
#[derive(Clone)]
pub enum Script {
    Report { delay: Duration, xml: String },
    Fail { delay: Duration, code: i32 },
    /// Waits until [`ScriptedRunner::release`] is called, then reports.
    Gated { xml: String },
}

/// A scanner that answers from a per-target script instead of running nmap.
pub struct ScriptedRunner {
    scripts: HashMap<String, Script>,
    gate: Arc<Semaphore>,
    calls: AtomicUsize,
    order: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            gate: Arc::new(Semaphore::new(0)),
            calls: AtomicUsize::new(0),
            order: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, target: &str, script: Script) -> Self {
        self.scripts.insert(target.to_string(), script);
        self
    }

    /// Lets one gated scan through.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Targets in the order their runs returned.
    pub fn finish_order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanRunner for ScriptedRunner {
    async fn run(&self, target: &str) -> Result<String, ScanExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let outcome = match self.scripts.get(target).cloned() {
            Some(Script::Report { delay, xml }) => {
                tokio::time::sleep(delay).await;
                Ok(xml)
            }
            Some(Script::Fail { delay, code }) => {
                tokio::time::sleep(delay).await;
                Err(ScanExecutionError::ExitStatus {
                    code: Some(code),
                    stderr: "Failed to resolve target".to_string(),
                })
            }
            Some(Script::Gated { xml }) => {
                let permit = self.gate.acquire().await.unwrap();
                permit.forget();
                Ok(xml)
            }
            None => Err(ScanExecutionError::EmptyOutput),
        };

        self.order.lock().unwrap().push(target.to_string());
        outcome
    }
}

/// A minimal nmap report with one `up` host per `(ip, mac)` pair.
pub fn report(hosts: &[(&str, &str)]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0"?><nmaprun scanner="nmap" args="nmap -oX -">"#);
    for (ip, mac) in hosts {
        xml.push_str(r#"<host><status state="up"/>"#);
        xml.push_str(&format!(r#"<address addr="{ip}" addrtype="ipv4"/>"#));
        if !mac.is_empty() {
            xml.push_str(&format!(r#"<address addr="{mac}" addrtype="mac"/>"#));
        }
        xml.push_str(
            r#"<ports><port protocol="tcp" portid="22"><state state="open"/><service name="ssh"/></port></ports>"#,
        );
        xml.push_str("</host>");
    }
    xml.push_str("</nmaprun>");
    xml
}

pub fn quick(xml: String) -> Script {
    Script::Report {
        delay: Duration::from_millis(10),
        xml,
    }
}

pub fn coordinator(runner: Arc<ScriptedRunner>) -> ScanCoordinator {
    ScanCoordinator::new(Arc::new(NetworkRegistry::new()), runner)
}

/// Polls `check_progress` the way a front-end would until it reports a completion.
pub async fn wait_for_progress(coordinator: &ScanCoordinator) {
    tokio::time::timeout(WAIT_LIMIT, async {
        while !coordinator.check_progress() {
            tokio::time::sleep(POLL_STEP).await;
        }
    })
    .await
    .expect("no scan finished in time");
}

pub async fn wait_until_idle(coordinator: &ScanCoordinator) {
    tokio::time::timeout(WAIT_LIMIT, async {
        while coordinator.active_count() > 0 {
            tokio::time::sleep(POLL_STEP).await;
        }
    })
    .await
    .expect("scans did not finish in time");
}

/// Waits until `count` scans have reached the runner.
pub async fn wait_for_calls(runner: &ScriptedRunner, count: usize) {
    tokio::time::timeout(WAIT_LIMIT, async {
        while runner.calls() < count {
            tokio::time::sleep(POLL_STEP).await;
        }
    })
    .await
    .expect("scans never started");
}
