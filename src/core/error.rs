// src/core/error.rs

use std::time::Duration;
use thiserror::Error;

/// Fatal configuration problems, caught and reported before any network I/O.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown check: {0} (use --list-checks to see available names)")]
    UnknownCheck(String),

    #[error("both http and https are disabled, nothing to scan for {0}")]
    NoSchemesEnabled(String),

    #[error("invalid host: {0}")]
    InvalidHost(String),
}

/// Failure of a single (check, base URL) invocation.
///
/// Everything except `Internal` is routine on the open internet and is
/// recovered at the orchestrator boundary as "no finding for this pair".
/// `Internal` marks a probe implementation bug and is logged loudly.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("dns: {0}")]
    Dns(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("unparseable response: {0}")]
    Parse(String),

    #[error("probe bug: {0}")]
    Internal(String),
}

impl From<hickory_resolver::error::ResolveError> for ProbeError {
    fn from(e: hickory_resolver::error::ResolveError) -> Self {
        ProbeError::Dns(e.to_string())
    }
}

impl ProbeError {
    /// Whether this error deserves an error-level log entry rather than the
    /// quiet debug treatment transport noise gets.
    pub fn is_loud(&self) -> bool {
        matches!(self, ProbeError::Internal(_))
    }
}
