//! # Error Taxonomy
//!
//! * [`ParseError`]: the report document could not be read at all.
//! * [`ScanExecutionError`]: the external scanner is missing or misbehaved.
//! * [`ScanError`]: why a scan request ended up `Failed`.
//! * [`SubmitError`]: a scan request was rejected before it was queued.
//!
//! A field that cannot be read inside an otherwise well-formed host record is
//! not an error. It falls back to the `"Unknown"` sentinel (or `0` for a port
//! number) and is only logged.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed report at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("report has no root element")]
    MissingRoot,

    #[error("report ended before <{name}> was closed")]
    UnclosedElement { name: String },
}

#[derive(Debug, Error)]
pub enum ScanExecutionError {
    #[error("scanner binary not found at '{path}' (is nmap installed and in PATH?)")]
    ToolMissing { path: String },

    #[error("failed to launch scanner: {0}")]
    Spawn(#[from] io::Error),

    #[error("scanner exited with {}: {stderr}", describe_exit(.code))]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("scanner produced no output")]
    EmptyOutput,

    #[error("refusing to scan '{target}': targets may not start with '-'")]
    InvalidTarget { target: String },

    #[error("scan task ended abnormally: {0}")]
    Aborted(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Execution(#[from] ScanExecutionError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("scan target must not be empty")]
    EmptyTarget,

    #[error("scans can only be submitted from within a Tokio runtime")]
    NoRuntime,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
