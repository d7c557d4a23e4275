// src/core/probes/backups.rs
//
// Leftovers of backup and maintenance work: archives dropped into the
// webroot, editor backup copies of live scripts, crash dumps.

use std::sync::Arc;

use crate::core::error::ProbeError;
use crate::core::models::Finding;
use crate::core::registry::Probe;
use crate::core::transport::{self, TargetContext, body_contains};

use super::{PathSignatureProbe, looks_like_html};

/// Archive files commonly produced by ad-hoc site backups. `{host}` covers
/// the "named the dump after the domain" habit.
const BACKUP_ARCHIVE_PATHS: &[&str] = &[
    "/backup.zip",
    "/backup.tar.gz",
    "/backup.tgz",
    "/backup.sql",
    "/www.zip",
    "/www.tar.gz",
    "/{host}.zip",
    "/{host}.tar.gz",
];

/// Editor/backup copies of the site's entry script. A hit leaks source code,
/// often including credentials.
const BACKUPFILES_PATHS: &[&str] = &[
    "/index.php~",
    "/index.php.bak",
    "/index.php.save",
    "/index.php.orig",
    "/index.php.old",
    "/index.bak",
    "/%23index.php%23",
];

const SQL_DUMP_PATHS: &[&str] = &["/dump.sql", "/database.sql", "/db.sql", "/{host}.sql"];

pub fn backup_archive() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("backup_archive", BACKUP_ARCHIVE_PATHS, is_archive)
}

pub fn backupfiles() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("backupfiles", BACKUPFILES_PATHS, is_php_source)
}

pub fn coredump() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("coredump", &["/core"], is_elf)
}

pub fn deadjoe() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("deadjoe", &["/DEADJOE"], is_deadjoe)
}

pub fn sql_dump() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("sql_dump", SQL_DUMP_PATHS, is_sql_dump)
}

pub fn xaa() -> Arc<dyn Probe> {
    Arc::new(Xaa)
}

/// ZIP local-file header, gzip magic, or a plaintext SQL dump.
fn is_archive(body: &[u8]) -> bool {
    body.starts_with(b"PK\x03\x04") || body.starts_with(b"\x1f\x8b") || is_sql_dump(body)
}

fn is_php_source(body: &[u8]) -> bool {
    body_contains(body, "<?php") || body.starts_with(b"<?")
}

/// Core dumps on anything this tool will realistically meet are ELF images.
fn is_elf(body: &[u8]) -> bool {
    body.starts_with(b"\x7fELF")
}

/// The fixed banner JOE writes into its crash recovery file.
fn is_deadjoe(body: &[u8]) -> bool {
    body_contains(body, "JOE when it aborted")
}

fn is_sql_dump(body: &[u8]) -> bool {
    !looks_like_html(body)
        && (body_contains(body, "INSERT INTO") || body_contains(body, "CREATE TABLE"))
}

/// The first chunk of a `split` run (`xaa`), typically half of a database
/// dump someone chopped up for transfer and forgot. The file has no usable
/// magic bytes, so this is the one check that consults the catch-all control
/// path instead of a content signature.
struct Xaa;

#[async_trait::async_trait]
impl Probe for Xaa {
    fn name(&self) -> &'static str {
        "xaa"
    }

    async fn run(&self, ctx: &TargetContext) -> Result<Option<Finding>, ProbeError> {
        let page = transport::fetch_path(ctx, "/xaa").await?;
        if !page.is_ok() || page.body.is_empty() || looks_like_html(&page.body) {
            return Ok(None);
        }
        if transport::is_catch_all(ctx).await? {
            return Ok(None);
        }
        Ok(Some(Finding::new(self.name(), ctx.url_for("/xaa"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_magic_bytes() {
        assert!(is_archive(b"PK\x03\x04rest-of-zip"));
        assert!(is_archive(b"\x1f\x8b\x08gzip"));
        assert!(!is_archive(b"<html>404 not found</html>"));
    }

    #[test]
    fn php_source_signature() {
        assert!(is_php_source(b"<?php echo 'hi'; ?>"));
        assert!(is_php_source(b"<? legacy short tag"));
        assert!(!is_php_source(b"plain text page"));
    }

    #[test]
    fn elf_magic() {
        assert!(is_elf(b"\x7fELF\x02\x01\x01\x00"));
        assert!(!is_elf(b"ELF without the prefix byte"));
    }

    #[test]
    fn deadjoe_banner() {
        assert!(is_deadjoe(
            b"*** These modified files were found in JOE when it aborted on ..."
        ));
        assert!(!is_deadjoe(b"unrelated text file"));
    }

    #[test]
    fn sql_dump_rejects_html() {
        assert!(is_sql_dump(b"-- dump\nCREATE TABLE users (id int);"));
        assert!(is_sql_dump(b"INSERT INTO secrets VALUES ('x');"));
        assert!(!is_sql_dump(b"<html><body>INSERT INTO is mentioned here</body></html>"));
    }
}
