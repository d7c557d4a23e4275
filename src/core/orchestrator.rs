// src/core/orchestrator.rs

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use hickory_resolver::TokioAsyncResolver;
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::core::error::ProbeError;
use crate::core::models::{Finding, ScanOptions, ScanOutcome};
use crate::core::registry::{Probe, ProbeScope};
use crate::core::reporter::Reporter;
use crate::core::target::host_of;
use crate::core::transport::TargetContext;

type SlotResult = Result<Option<Finding>, ProbeError>;

/// Run the selected checks against every base URL of one target host.
///
/// Base URLs are visited in resolver order. For each reachable URL all probes
/// are spawned into a bounded pool and their results collected into an
/// index-addressed buffer, then flushed to the reporter in registry order, so
/// output stays deterministic no matter how the pool interleaves completions.
///
/// Every invocation is isolated: timeouts, transport failures and parse
/// errors count as "no finding" for that (check, URL) pair; probe bugs and
/// panics are logged loudly but never abort the scan. A target whose base
/// URLs all fail the reachability preflight is reported once as unreachable.
pub async fn scan_host(
    target: &str,
    base_urls: &[String],
    probes: &[Arc<dyn Probe>],
    client: &Client,
    resolver: &TokioAsyncResolver,
    options: &Arc<ScanOptions>,
    reporter: &mut Reporter,
) -> io::Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();
    let mut hosts_probed: HashSet<String> = HashSet::new();
    let mut any_reachable = false;

    info!(target, urls = base_urls.len(), checks = probes.len(), "starting scan");

    for base_url in base_urls {
        if !preflight(client, base_url).await {
            warn!(%base_url, "unreachable, skipping its checks");
            continue;
        }
        any_reachable = true;

        let host = host_of(base_url).unwrap_or_else(|| base_url.clone());
        // Host-scoped probes run on the first reachable base URL of each host
        // only; later scheme variants would just duplicate their findings.
        let first_for_host = hosts_probed.insert(host.clone());

        let semaphore = Arc::new(Semaphore::new(options.concurrency));
        let mut set: JoinSet<(usize, SlotResult)> = JoinSet::new();
        let mut slots: Vec<Option<SlotResult>> = Vec::with_capacity(probes.len());
        slots.resize_with(probes.len(), || None);

        for (idx, probe) in probes.iter().enumerate() {
            if probe.scope() == ProbeScope::PerHost && !first_for_host {
                slots[idx] = Some(Ok(None));
                continue;
            }
            let ctx = TargetContext {
                base_url: base_url.clone(),
                host: host.clone(),
                client: client.clone(),
                resolver: resolver.clone(),
                options: options.clone(),
            };
            let probe = probe.clone();
            let semaphore = semaphore.clone();
            let per_probe_timeout = options.timeout;
            set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (idx, Err(ProbeError::Internal("probe pool closed".into())));
                    }
                };
                let result = match timeout(per_probe_timeout, probe.run(&ctx)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProbeError::Timeout(per_probe_timeout)),
                };
                (idx, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(join_error) if join_error.is_panic() => {
                    // A panicking probe is a programmer error: shout, keep going.
                    error!(%base_url, %join_error, "probe panicked");
                    outcome.errors += 1;
                }
                Err(join_error) => {
                    debug!(%base_url, %join_error, "probe task cancelled");
                }
            }
        }

        // Flush this URL's results in registry order.
        for (idx, slot) in slots.into_iter().enumerate() {
            let check = probes[idx].name();
            match slot {
                Some(Ok(Some(finding))) => {
                    reporter.emit(&finding)?;
                    outcome.findings.push(finding);
                }
                Some(Ok(None)) => {}
                Some(Err(ProbeError::Timeout(after))) => {
                    debug!(check, %base_url, ?after, "check timed out");
                    outcome.timeouts += 1;
                }
                Some(Err(probe_error)) if probe_error.is_loud() => {
                    error!(check, %base_url, %probe_error, "check failed with a probe bug");
                    outcome.errors += 1;
                }
                Some(Err(probe_error)) => {
                    debug!(check, %base_url, %probe_error, "check failed");
                    outcome.errors += 1;
                }
                None => {} // panicked, already counted
            }
        }
    }

    if !any_reachable {
        eprintln!("{target}: no base URL was reachable");
        outcome.unreachable = true;
    }

    info!(
        target,
        findings = outcome.findings.len(),
        timeouts = outcome.timeouts,
        errors = outcome.errors,
        "scan finished"
    );
    Ok(outcome)
}

/// One cheap GET to decide whether a base URL is worth probing at all. Any
/// HTTP answer (even a 5xx) counts as reachable; only connection-level
/// failures rule a URL out.
async fn preflight(client: &Client, base_url: &str) -> bool {
    match client.get(base_url).send().await {
        Ok(_) => true,
        Err(e) if e.is_connect() || e.is_timeout() => false,
        Err(e) => {
            debug!(%base_url, error = %e, "preflight error, treating as reachable");
            true
        }
    }
}
