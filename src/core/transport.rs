// src/core/transport.rs

use std::borrow::Cow;
use std::sync::Arc;

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::core::error::ProbeError;
use crate::core::models::ScanOptions;

/// Response bodies are capped so a misbehaving server cannot balloon memory;
/// every signature this tool looks for sits well within the first megabyte.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Fixed control path used to fingerprint catch-all servers that answer 200
/// for everything. Weak-signature probes refuse to report when this path
/// "exists". A constant (rather than a random token) keeps runs deterministic.
pub const CONTROL_PATH: &str = "/.well-known/leakhound-absent-7f3a1c.html";

/// Everything a probe invocation may touch: the base URL under test, the bare
/// hostname for DNS work, shared transport handles and global options.
/// Constructed once per (check, base URL) pairing and never mutated.
#[derive(Clone)]
pub struct TargetContext {
    pub base_url: String,
    pub host: String,
    pub client: Client,
    pub resolver: TokioAsyncResolver,
    pub options: Arc<ScanOptions>,
}

impl TargetContext {
    /// Absolute URL for a probe path (`path` must start with '/').
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Build the shared HTTP client for a scan run.
///
/// Certificate validation is deliberately off: hosts with broken TLS are
/// exactly the kind of neglected deployment this tool exists for, and the
/// scanner never submits credentials. Redirects are off too: a redirect to a
/// pretty error page is indistinguishable from a hit once followed.
pub fn build_client(options: &ScanOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.clone())
        .danger_accept_invalid_certs(true)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(options.timeout)
        .build()
}

/// System-configured resolver handle shared by all DNS-level probes.
pub fn build_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
}

/// A fetched HTTP response with its body read up to [`MAX_BODY_BYTES`].
pub struct FetchedPage {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Lossy text view of the body, for string-signature checks.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// GET a probe path relative to the context's base URL.
pub async fn fetch_path(ctx: &TargetContext, path: &str) -> Result<FetchedPage, ProbeError> {
    fetch_url(&ctx.client, &ctx.url_for(path)).await
}

/// GET an absolute URL with the capped body read.
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, ProbeError> {
    debug!(url, "fetching");
    let mut response = client.get(url).send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            body.extend_from_slice(&chunk[..MAX_BODY_BYTES - body.len()]);
            debug!(url, "body truncated at cap");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(FetchedPage {
        status,
        headers,
        body,
    })
}

/// True when the server answers 200 for a path that cannot exist, the
/// catch-all / soft-404 fingerprint.
pub async fn is_catch_all(ctx: &TargetContext) -> Result<bool, ProbeError> {
    let page = fetch_path(ctx, CONTROL_PATH).await?;
    Ok(page.is_ok())
}

/// Case-insensitive substring search over raw bytes, used by signature
/// matchers that must not assume valid UTF-8.
pub fn body_contains(body: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    if needle.is_empty() || body.len() < needle.len() {
        return false;
    }
    body.windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_contains_is_case_insensitive() {
        assert!(body_contains(b"<HTML><body>", "<html"));
        assert!(!body_contains(b"plain text", "<html"));
        assert!(!body_contains(b"ab", "abc"));
    }
}
