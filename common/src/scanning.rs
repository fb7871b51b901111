use async_trait::async_trait;

use crate::error::ScanExecutionError;

/// Runs the external scanner against one target and hands back its raw report.
///
/// Implementations may block for as long as the scan takes; the coordinator
/// runs every call on its own task.
#[async_trait]
pub trait ScanRunner: Send + Sync {
    async fn run(&self, target: &str) -> Result<String, ScanExecutionError>;
}
