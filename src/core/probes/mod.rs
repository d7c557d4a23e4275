// src/core/probes/mod.rs

// One module per family of exposure. Each check's detection threshold is a
// fixed, documented constant local to its probe; nothing here shares state.
pub mod backups;
pub mod client_config;
pub mod content;
pub mod dns;
pub mod frameworks;
pub mod keys;
pub mod server;
pub mod vcs;

use std::sync::Arc;

use tracing::debug;

use crate::core::error::ProbeError;
use crate::core::models::Finding;
use crate::core::registry::{CheckRegistry, Probe};
use crate::core::transport::{self, TargetContext, body_contains};

/// Register every built-in check, in canonical order. This order is the
/// output-ordering contract, so entries are appended, never sorted.
pub fn register_all(registry: &mut CheckRegistry) {
    let probes: Vec<Arc<dyn Probe>> = vec![
        backups::backup_archive(),
        backups::backupfiles(),
        vcs::git_dir(),
        vcs::svn_dir(),
        vcs::cvs_dir(),
        backups::coredump(),
        backups::deadjoe(),
        client_config::ds_store(),
        client_config::desktopini(),
        client_config::idea(),
        frameworks::lfm_php(),
        frameworks::rails_database_yml(),
        frameworks::symphony_databases_yml(),
        frameworks::magento_config(),
        frameworks::drupal_backup_migrate(),
        client_config::php_cs_cache(),
        client_config::sftp_config(),
        client_config::wsftp_ini(),
        client_config::filezilla_xml(),
        client_config::winscp_ini(),
        keys::privatekey(),
        keys::dotenv(),
        backups::sql_dump(),
        backups::xaa(),
        frameworks::elmah(),
        frameworks::apache_server_status(),
        server::optionsbleed(),
        server::acmereflect(),
        content::invalidsrc(),
        dns::axfr(),
    ];
    for probe in probes {
        registry.register(probe);
    }
}

/// The workhorse for path-existence checks: GET each candidate path and
/// report the first one whose 200 body passes the signature matcher. The
/// matcher is the probe's entire false-positive defense, so weak matchers do
/// not belong here (see `backups::Xaa` for the control-path variant).
pub struct PathSignatureProbe {
    name: &'static str,
    /// Candidate paths, each starting with '/'. `{host}` expands to the bare
    /// hostname of the target.
    paths: &'static [&'static str],
    matches: fn(&[u8]) -> bool,
}

impl PathSignatureProbe {
    pub fn probe(
        name: &'static str,
        paths: &'static [&'static str],
        matches: fn(&[u8]) -> bool,
    ) -> Arc<dyn Probe> {
        Arc::new(Self {
            name,
            paths,
            matches,
        })
    }
}

#[async_trait::async_trait]
impl Probe for PathSignatureProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, ctx: &TargetContext) -> Result<Option<Finding>, ProbeError> {
        for path in self.paths {
            let path = if path.contains("{host}") {
                path.replace("{host}", &ctx.host)
            } else {
                (*path).to_string()
            };
            // A failed request for one candidate must not mute the rest.
            let page = match transport::fetch_path(ctx, &path).await {
                Ok(page) => page,
                Err(e) => {
                    debug!(check = self.name, %path, error = %e, "candidate path request failed");
                    continue;
                }
            };
            if page.is_ok() && !page.body.is_empty() && (self.matches)(&page.body) {
                return Ok(Some(Finding::new(self.name, ctx.url_for(&path))));
            }
        }
        Ok(None)
    }
}

/// Rough HTML sniff over the first bytes of a body. Used by probes whose
/// target resource is never HTML, to throw out soft-404 pages.
pub fn looks_like_html(body: &[u8]) -> bool {
    let head = &body[..body.len().min(256)];
    body_contains(head, "<html") || body_contains(head, "<!doctype") || body_contains(head, "<head")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_sniff_hits_doctype_and_tag() {
        assert!(looks_like_html(b"<!DOCTYPE html><html>"));
        assert!(looks_like_html(b"  <HTML lang=\"en\">"));
        assert!(!looks_like_html(b"\x7fELF\x02\x01\x01"));
        assert!(!looks_like_html(b"PK\x03\x04"));
    }
}
