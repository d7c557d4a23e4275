// src/core/probes/content.rs
//
// Content-inspection archetype: fetch the front page, parse it, follow up on
// what it references.

use std::sync::Arc;

use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::core::error::ProbeError;
use crate::core::models::Finding;
use crate::core::registry::{Probe, ProbeScope};
use crate::core::transport::{self, TargetContext};

pub fn invalidsrc() -> Arc<dyn Probe> {
    Arc::new(InvalidSrc)
}

/// Script/image/frame sources pointing at hostnames that no longer resolve.
/// An NXDOMAIN src is a takeover candidate: whoever registers that domain
/// gets to serve content (often script) into this page.
struct InvalidSrc;

/// Upper bound on external hosts resolved per page, to keep the probe from
/// turning into a crawler on link-farm front pages.
const MAX_SRC_HOSTS: usize = 10;

#[async_trait::async_trait]
impl Probe for InvalidSrc {
    fn name(&self) -> &'static str {
        "invalidsrc"
    }

    fn scope(&self) -> ProbeScope {
        ProbeScope::PerHost
    }

    async fn run(&self, ctx: &TargetContext) -> Result<Option<Finding>, ProbeError> {
        let page = transport::fetch_path(ctx, "/").await?;
        if !page.is_ok() {
            return Ok(None);
        }
        // `Html` is not Send, so parsing happens in a scope with no awaits.
        let hosts = external_src_hosts(&page.text(), &ctx.host);

        for host in hosts.into_iter().take(MAX_SRC_HOSTS) {
            match ctx.resolver.lookup_ip(host.as_str()).await {
                Ok(_) => {}
                Err(e) => match e.kind() {
                    ResolveErrorKind::NoRecordsFound { response_code, .. }
                        if *response_code == ResponseCode::NXDomain =>
                    {
                        return Ok(Some(
                            Finding::new(self.name(), ctx.url_for("/"))
                                .with_detail(format!("references unresolvable host {host}")),
                        ));
                    }
                    _ => debug!(host, error = %e, "src host lookup failed, not conclusive"),
                },
            }
        }
        Ok(None)
    }
}

/// Distinct external hostnames referenced by src attributes, in document
/// order (first occurrence wins, which keeps output deterministic).
fn external_src_hosts(html: &str, own_host: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("script[src], img[src], iframe[src]").expect("static selector");
    let mut hosts = Vec::new();
    for element in document.select(&selector) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        let Ok(url) = Url::parse(src) else {
            continue; // relative src, same host by definition
        };
        let Some(host) = url.host_str() else {
            continue;
        };
        if host != own_host && !hosts.iter().any(|h| h == host) {
            hosts.push(host.to_string());
        }
    }
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_external_hosts_in_document_order() {
        let html = r#"<html><body>
            <script src="https://cdn-one.example/app.js"></script>
            <img src="/local/logo.png">
            <img src="https://img.example.net/pic.jpg">
            <script src="https://cdn-one.example/other.js"></script>
            <iframe src="https://example.com/frame"></iframe>
        </body></html>"#;
        let hosts = external_src_hosts(html, "example.com");
        assert_eq!(hosts, ["cdn-one.example", "img.example.net"]);
    }

    #[test]
    fn relative_sources_are_ignored() {
        let html = r#"<img src="logo.png"><script src="/js/app.js"></script>"#;
        assert!(external_src_hosts(html, "example.com").is_empty());
    }
}
