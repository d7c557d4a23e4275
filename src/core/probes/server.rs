// src/core/probes/server.rs
//
// Server-behavior checks that need request shapes the path-signature probe
// cannot express: a raw OPTIONS request, a reflection test path.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::ProbeError;
use crate::core::models::Finding;
use crate::core::registry::Probe;
use crate::core::transport::{self, TargetContext};

pub fn optionsbleed() -> Arc<dyn Probe> {
    Arc::new(Optionsbleed)
}

pub fn acmereflect() -> Arc<dyn Probe> {
    Arc::new(AcmeReflect)
}

/// CVE-2017-9798: a use-after-free makes Apache leak heap memory into the
/// `Allow` response header. The corruption is probabilistic, so the request
/// is repeated a few times.
struct Optionsbleed;

const OPTIONSBLEED_ATTEMPTS: usize = 3;

static VALID_ALLOW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z-]+(?:\s*,\s*[A-Za-z-]+)*$").expect("static regex"));

#[async_trait::async_trait]
impl Probe for Optionsbleed {
    fn name(&self) -> &'static str {
        "optionsbleed"
    }

    async fn run(&self, ctx: &TargetContext) -> Result<Option<Finding>, ProbeError> {
        let url = ctx.url_for("/");
        for _ in 0..OPTIONSBLEED_ATTEMPTS {
            let response = ctx
                .client
                .request(reqwest::Method::OPTIONS, &url)
                .send()
                .await?;
            let Some(allow) = response.headers().get(reqwest::header::ALLOW) else {
                continue;
            };
            let allow = String::from_utf8_lossy(allow.as_bytes()).into_owned();
            if !allow_header_is_sane(&allow) {
                return Ok(Some(
                    Finding::new(self.name(), &url).with_detail(format!("Allow: {allow}")),
                ));
            }
        }
        Ok(None)
    }
}

/// A sane Allow header is a comma-separated list of method tokens with no
/// repeats. Anything else is leaked memory or severe misconfiguration.
fn allow_header_is_sane(allow: &str) -> bool {
    let allow = allow.trim();
    if allow.is_empty() || !VALID_ALLOW.is_match(allow) {
        return false;
    }
    let mut seen = HashSet::new();
    allow
        .split(',')
        .map(|token| token.trim().to_ascii_uppercase())
        .all(|token| seen.insert(token))
}

/// Some ACME HTTP-01 responders echo the requested token back verbatim. If
/// the echo keeps an injected `<` and is served as text/html, the host has a
/// reflected-markup endpoint on a trusted path.
struct AcmeReflect;

const ACME_REFLECT_PATH: &str = "/.well-known/acme-challenge/reflect%3Chtml%3E";
const ACME_REFLECT_MARKER: &str = "reflect<html>";

#[async_trait::async_trait]
impl Probe for AcmeReflect {
    fn name(&self) -> &'static str {
        "acmereflect"
    }

    async fn run(&self, ctx: &TargetContext) -> Result<Option<Finding>, ProbeError> {
        let page = transport::fetch_path(ctx, ACME_REFLECT_PATH).await?;
        if !page.is_ok() {
            return Ok(None);
        }
        let is_html = page
            .content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html"));
        if is_html && page.text().contains(ACME_REFLECT_MARKER) {
            return Ok(Some(Finding::new(
                self.name(),
                ctx.url_for(ACME_REFLECT_PATH),
            )));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sane_allow_headers_pass() {
        assert!(allow_header_is_sane("GET, HEAD, POST, OPTIONS"));
        assert!(allow_header_is_sane("GET,HEAD"));
        assert!(allow_header_is_sane("GET"));
    }

    #[test]
    fn corrupted_allow_headers_fail() {
        // Leaked heap bytes rarely look like method tokens.
        assert!(!allow_header_is_sane("GET, HEAD, \x01\x7f, POST"));
        assert!(!allow_header_is_sane("GET, HEAD, allow: GET"));
        // Duplicate methods are the other published optionsbleed symptom.
        assert!(!allow_header_is_sane("GET, HEAD, GET"));
        assert!(!allow_header_is_sane(""));
    }
}
