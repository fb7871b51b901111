//! # Scan Coordinator
//!
//! Runs any number of scans side by side and lets a caller poll for results.
//!
//! Every submitted target becomes a [`ScanRequest`] moving through
//! `Queued → Running → Completed | Failed`, each on its own Tokio task. A
//! completing task parses the report and saves the devices into the
//! [`NetworkRegistry`] *before* it marks the request finished, so once
//! [`ScanCoordinator::check_progress`] reports a completion the registry
//! already holds the data.
//!
//! Terminal requests stay in the table until [`ScanCoordinator::clear_completed`]
//! is called. Failures are never raised to the poller; they are recorded on
//! the request. Scans cannot be cancelled once started.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use nmapviz_common::config::Config;
use nmapviz_common::error::{ScanError, ScanExecutionError, SubmitError};
use nmapviz_common::network::device::{DeviceInfo, Network};
use nmapviz_common::scanning::ScanRunner;
use nmapviz_common::success;
use nmapviz_common::vendors::VendorRepository;

use crate::registry::NetworkRegistry;
use crate::{report, vendors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScanId(u64);

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl ScanState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

/// Bookkeeping for one submitted target.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    id: ScanId,
    identifier: String,
    target: String,
    state: ScanState,
    result: Option<Vec<DeviceInfo>>,
    failure: Option<String>,
}

impl ScanRequest {
    pub fn id(&self) -> ScanId {
        self.id
    }

    /// Name the devices are saved under in the registry.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Parsed devices, present once the request has completed.
    pub fn result(&self) -> Option<&[DeviceInfo]> {
        self.result.as_deref()
    }

    /// Why the request failed, present only in the `Failed` state.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

pub struct ScanCoordinator {
    shared: Arc<Shared>,
    limiter: Option<Arc<Semaphore>>,
}

/// State touched by both the polling caller and the scan tasks.
struct Shared {
    registry: Arc<NetworkRegistry>,
    runner: Arc<dyn ScanRunner>,
    vendors: Option<Arc<dyn VendorRepository>>,
    requests: Mutex<BTreeMap<ScanId, ScanRequest>>,
    finished_since_check: AtomicBool,
    next_id: AtomicU64,
}

impl ScanCoordinator {
    pub fn new(registry: Arc<NetworkRegistry>, runner: Arc<dyn ScanRunner>) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry,
                runner,
                vendors: None,
                requests: Mutex::new(BTreeMap::new()),
                finished_since_check: AtomicBool::new(false),
                next_id: AtomicU64::new(1),
            }),
            limiter: None,
        }
    }

    /// Applies the concurrency cap and vendor lookup settings from `cfg`.
    pub fn from_config(
        cfg: &Config,
        registry: Arc<NetworkRegistry>,
        runner: Arc<dyn ScanRunner>,
        vendors: Option<Arc<dyn VendorRepository>>,
    ) -> Self {
        let mut coordinator = Self::new(registry, runner);
        if let Some(limit) = cfg.max_concurrent_scans {
            coordinator = coordinator.with_concurrency_limit(limit);
        }
        if cfg.resolve_vendors {
            if let Some(repo) = vendors {
                coordinator = coordinator.with_vendor_repository(repo);
            }
        }
        coordinator
    }

    /// At most `limit` scans run at once; the rest wait as `Queued`.
    ///
    /// A limit of zero is treated as one.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(limit.max(1))));
        self
    }

    /// Fills in the vendor of devices that have a MAC but no vendor in the report.
    ///
    /// Must be called before the first scan is submitted.
    pub fn with_vendor_repository(mut self, repo: Arc<dyn VendorRepository>) -> Self {
        match Arc::get_mut(&mut self.shared) {
            Some(shared) => shared.vendors = Some(repo),
            None => warn!("vendor repository ignored: scans already in flight"),
        }
        self
    }

    pub fn registry(&self) -> &Arc<NetworkRegistry> {
        &self.shared.registry
    }

    /// Queues a scan of `target`, saved under `identifier`, and starts it right away.
    ///
    /// Returns as soon as the scan task has been spawned. Must be called from
    /// within a Tokio runtime.
    pub fn add_scan(&self, identifier: &str, target: &str) -> Result<ScanId, SubmitError> {
        let target: &str = target.trim();
        if target.is_empty() {
            return Err(SubmitError::EmptyTarget);
        }
        let runtime: Handle = Handle::try_current().map_err(|_| SubmitError::NoRuntime)?;

        let id = ScanId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let identifier: &str = if identifier.trim().is_empty() {
            target
        } else {
            identifier
        };

        self.shared.requests().insert(
            id,
            ScanRequest {
                id,
                identifier: identifier.to_string(),
                target: target.to_string(),
                state: ScanState::Queued,
                result: None,
                failure: None,
            },
        );
        info!(%id, scan_target = target, "scan queued");

        let shared = Arc::clone(&self.shared);
        let limiter = self.limiter.clone();
        runtime.spawn(async move { shared.execute(id, limiter).await });

        Ok(id)
    }

    /// `true` when at least one request finished since the previous call.
    ///
    /// Meant to be called on a fixed interval. By the time it returns `true`,
    /// completed scans are already in the registry.
    pub fn check_progress(&self) -> bool {
        self.shared.finished_since_check.swap(false, Ordering::AcqRel)
    }

    /// Removes every `Completed` or `Failed` request and hands them back in
    /// submission order.
    ///
    /// Selection and removal happen under one lock, so a request that turns
    /// terminal concurrently is either returned here or left for the next call.
    pub fn clear_completed(&self) -> Vec<ScanRequest> {
        let mut requests = self.shared.requests();
        let finished: Vec<ScanId> = requests
            .values()
            .filter(|request| request.state.is_terminal())
            .map(|request| request.id)
            .collect();
        finished
            .iter()
            .filter_map(|id| requests.remove(id))
            .collect()
    }

    /// Requests that are `Queued` or `Running`.
    pub fn active_count(&self) -> usize {
        self.shared
            .requests()
            .values()
            .filter(|request| request.state.is_active())
            .count()
    }

    /// Every tracked request, in submission order.
    pub fn requests(&self) -> Vec<ScanRequest> {
        self.shared.requests().values().cloned().collect()
    }

    pub fn request(&self, id: ScanId) -> Option<ScanRequest> {
        self.shared.requests().get(&id).cloned()
    }

    /// Number of tracked requests, finished ones included.
    pub fn len(&self) -> usize {
        self.shared.requests().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.requests().is_empty()
    }
}

impl Shared {
    // Each critical section writes a whole field or entry, so a poisoned guard is still consistent.
    fn requests(&self) -> MutexGuard<'_, BTreeMap<ScanId, ScanRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn execute(self: Arc<Self>, id: ScanId, limiter: Option<Arc<Semaphore>>) {
        let _permit = match limiter {
            Some(semaphore) => semaphore.acquire_owned().await.ok(),
            None => None,
        };

        let Some(target) = self.mark_running(id) else {
            return;
        };
        info!(%id, scan_target = %target, "scan started");

        let pipeline = tokio::spawn(ingest(
            Arc::clone(&self.runner),
            self.vendors.clone(),
            target.clone(),
        ));
        let outcome: Result<Vec<DeviceInfo>, ScanError> = match pipeline.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ScanExecutionError::Aborted(e.to_string()).into()),
        };

        match outcome {
            Ok(devices) => {
                let identifier: String = self
                    .requests()
                    .get(&id)
                    .map(|request| request.identifier.clone())
                    .unwrap_or_else(|| target.clone());

                let network = Network::new(identifier, devices);
                let devices: Vec<DeviceInfo> = network.devices().to_vec();
                self.registry.insert(network);
                success!(%id, scan_target = %target, hosts = devices.len(), "scan completed");
                self.finish(id, ScanState::Completed, Some(devices), None);
            }
            Err(e) => {
                warn!(%id, scan_target = %target, "scan failed: {e}");
                self.finish(id, ScanState::Failed, None, Some(e.to_string()));
            }
        }
    }

    fn mark_running(&self, id: ScanId) -> Option<String> {
        let mut requests = self.requests();
        let request = requests.get_mut(&id)?;
        request.state = ScanState::Running;
        Some(request.target.clone())
    }

    fn finish(
        &self,
        id: ScanId,
        state: ScanState,
        result: Option<Vec<DeviceInfo>>,
        failure: Option<String>,
    ) {
        {
            let mut requests = self.requests();
            if let Some(request) = requests.get_mut(&id) {
                request.state = state;
                request.result = result;
                request.failure = failure;
            }
        }
        self.finished_since_check.store(true, Ordering::Release);
    }
}

/// Runs the scanner, parses its report and enriches the devices. Holds no locks.
async fn ingest(
    runner: Arc<dyn ScanRunner>,
    vendor_repo: Option<Arc<dyn VendorRepository>>,
    target: String,
) -> Result<Vec<DeviceInfo>, ScanError> {
    let raw_report: String = runner.run(&target).await?;
    let devices: Vec<DeviceInfo> = report::parse(&raw_report)?;
    debug!(scan_target = %target, hosts = devices.len(), "report parsed");

    Ok(match vendor_repo {
        Some(repo) => vendors::fill_missing_vendors(devices, repo.as_ref()),
        None => devices,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
