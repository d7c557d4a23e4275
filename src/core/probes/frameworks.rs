// src/core/probes/frameworks.rs
//
// Framework- and server-specific leaks: configuration files with database
// credentials, admin endpoints left world-readable, writable backup dirs.

use std::sync::Arc;

use crate::core::registry::Probe;
use crate::core::transport::body_contains;

use super::{PathSignatureProbe, looks_like_html};

pub fn lfm_php() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("lfm_php", &["/lfm.php"], is_lfm)
}

pub fn rails_database_yml() -> Arc<dyn Probe> {
    PathSignatureProbe::probe(
        "rails_database_yml",
        &["/config/database.yml"],
        is_rails_database_yml,
    )
}

pub fn symphony_databases_yml() -> Arc<dyn Probe> {
    PathSignatureProbe::probe(
        "symphony_databases_yml",
        &["/app/config/databases.yml"],
        is_symfony_databases_yml,
    )
}

pub fn magento_config() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("magento_config", &["/app/etc/local.xml"], is_magento_local_xml)
}

pub fn drupal_backup_migrate() -> Arc<dyn Probe> {
    PathSignatureProbe::probe(
        "drupal_backup_migrate",
        &["/sites/default/files/backup_migrate/"],
        is_directory_listing,
    )
}

pub fn elmah() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("elmah", &["/elmah.axd"], is_elmah)
}

pub fn apache_server_status() -> Arc<dyn Probe> {
    PathSignatureProbe::probe(
        "apache_server_status",
        &["/server-status"],
        is_apache_status,
    )
}

/// "Lazy File Manager" puts its name in the page title.
fn is_lfm(body: &[u8]) -> bool {
    body_contains(body, "Lazy File Manager")
}

/// Rails database.yml always names an adapter.
fn is_rails_database_yml(body: &[u8]) -> bool {
    !looks_like_html(body) && body_contains(body, "adapter:")
}

/// symfony 1.x databases.yml: a `param:` block under a class entry.
fn is_symfony_databases_yml(body: &[u8]) -> bool {
    !looks_like_html(body) && body_contains(body, "param:")
}

/// Magento 1.x local.xml carries the crypt key and DB credentials.
fn is_magento_local_xml(body: &[u8]) -> bool {
    body_contains(body, "<config") && body_contains(body, "<crypt")
}

/// Directory-listing archetype: the backup_migrate dir must never be
/// browsable, an autoindex page means every site backup is downloadable.
fn is_directory_listing(body: &[u8]) -> bool {
    body_contains(body, "Index of /") || body_contains(body, "[To Parent Directory]")
}

/// ELMAH error log viewer banner.
fn is_elmah(body: &[u8]) -> bool {
    body_contains(body, "Error Log for")
}

fn is_apache_status(body: &[u8]) -> bool {
    body_contains(body, "Apache Server Status")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_signatures() {
        assert!(is_rails_database_yml(
            b"production:\n  adapter: postgresql\n  password: hunter2\n"
        ));
        assert!(!is_rails_database_yml(b"<html>adapter: docs</html>"));
        assert!(is_symfony_databases_yml(
            b"all:\n  propel:\n    class: sfPropelDatabase\n    param:\n      dsn: mysql:...\n"
        ));
        assert!(is_magento_local_xml(
            b"<config><global><crypt><key>abc</key></crypt></global></config>"
        ));
    }

    #[test]
    fn listing_and_status_pages() {
        assert!(is_directory_listing(
            b"<html><title>Index of /sites/default/files/backup_migrate/</title></html>"
        ));
        assert!(!is_directory_listing(b"<html>403 Forbidden</html>"));
        assert!(is_apache_status(b"<html><h1>Apache Server Status for example.com</h1>"));
        assert!(is_elmah(b"<title>Error Log for /</title>"));
        assert!(is_lfm(b"<title>Lazy File Manager</title>"));
    }
}
