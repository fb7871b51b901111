//! Runs the nmap binary and collects its XML report from stdout.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use nmapviz_common::config::Config;
use nmapviz_common::error::ScanExecutionError;
use nmapviz_common::scanning::ScanRunner;

pub struct NmapRunner {
    nmap_path: PathBuf,
    extra_args: Vec<String>,
}

impl NmapRunner {
    pub fn new(nmap_path: impl Into<PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            nmap_path: nmap_path.into(),
            extra_args,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.nmap_path.clone(), cfg.nmap_args.clone())
    }

    /// `<nmap> -oX - <extra args…> <target>`, run without a shell.
    fn command(&self, target: &str) -> Command {
        let mut cmd = Command::new(&self.nmap_path);
        cmd.arg("-oX")
            .arg("-")
            .args(&self.extra_args)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ScanRunner for NmapRunner {
    async fn run(&self, target: &str) -> Result<String, ScanExecutionError> {
        if target.starts_with('-') {
            return Err(ScanExecutionError::InvalidTarget {
                target: target.to_string(),
            });
        }

        debug!(scan_target = target, binary = %self.nmap_path.display(), "launching nmap");
        let output = self
            .command(target)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ScanExecutionError::ToolMissing {
                    path: self.nmap_path.display().to_string(),
                },
                _ => ScanExecutionError::Spawn(e),
            })?;

        if !output.status.success() {
            return Err(ScanExecutionError::ExitStatus {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let report: String = String::from_utf8_lossy(&output.stdout).into_owned();
        if report.trim().is_empty() {
            return Err(ScanExecutionError::EmptyOutput);
        }

        Ok(report)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
