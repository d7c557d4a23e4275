// src/core/models.rs

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A positive detection result produced by a probe.
///
/// Immutable once constructed. The `check` field normally equals the probe's
/// registered name; the `privatekey` probe qualifies it with the detected key
/// format (e.g. `privatekey_pkcs8`), matching the tool's historic output tags.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub check: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Finding {
    pub fn new(check: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            url: url.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// The one-line text rendering is an external contract consumed by downstream
// tooling: `[<check>] <url>` plus an optional `: <detail>`, nothing else.
impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "[{}] {}: {}", self.check, self.url, detail),
            None => write!(f, "[{}] {}", self.check, self.url),
        }
    }
}

/// Global options relevant to probe invocations. Built once from the CLI and
/// shared read-only across the whole run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Per-invocation timeout enforced by the orchestrator.
    pub timeout: Duration,
    /// Upper bound on concurrently running probe invocations.
    pub concurrency: usize,
    /// User-Agent header sent with every HTTP request.
    pub user_agent: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            concurrency: 10,
            user_agent: format!(
                "Mozilla/5.0 (compatible; leakhound/{})",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

/// Aggregated result of scanning one target host.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Findings in invocation order (base URLs outer, registry order inner).
    pub findings: Vec<Finding>,
    /// Probe invocations that hit the timeout boundary.
    pub timeouts: usize,
    /// Probe invocations that failed with a recoverable error.
    pub errors: usize,
    /// True when no base URL of the target answered at all.
    pub unreachable: bool,
}

impl ScanOutcome {
    pub fn merge(&mut self, other: ScanOutcome) {
        self.findings.extend(other.findings);
        self.timeouts += other.timeouts;
        self.errors += other.errors;
        self.unreachable |= other.unreachable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_line_without_detail() {
        let f = Finding::new("git_dir", "https://example.com/.git/config");
        assert_eq!(f.to_string(), "[git_dir] https://example.com/.git/config");
    }

    #[test]
    fn finding_line_with_detail() {
        let f = Finding::new("axfr", "example.com").with_detail("ns1.example.com: 42 records");
        assert_eq!(f.to_string(), "[axfr] example.com: ns1.example.com: 42 records");
    }
}
