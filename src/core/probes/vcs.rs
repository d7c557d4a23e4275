// src/core/probes/vcs.rs
//
// Version control metadata deployed along with the site. A readable
// `.git/config` usually means the whole repository can be reconstructed.

use std::sync::Arc;

use crate::core::registry::Probe;
use crate::core::transport::body_contains;

use super::PathSignatureProbe;

pub fn git_dir() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("git_dir", &["/.git/config"], is_git_config)
}

pub fn svn_dir() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("svn_dir", &["/.svn/wc.db", "/.svn/entries"], is_svn_metadata)
}

pub fn cvs_dir() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("cvs_dir", &["/CVS/Root"], is_cvs_root)
}

/// Every git config starts its sections with `[core]`.
fn is_git_config(body: &[u8]) -> bool {
    body_contains(body, "[core]")
}

/// Subversion 1.7+ keeps an SQLite database (`wc.db`); older checkouts have a
/// plaintext `entries` file that opens with its bare format number.
fn is_svn_metadata(body: &[u8]) -> bool {
    if body.starts_with(b"SQLite format 3\0") {
        return true;
    }
    match body.split(|&b| b == b'\n').next() {
        Some(first_line) if !first_line.is_empty() && first_line.len() <= 2 => {
            first_line.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

/// CVS/Root holds a repository locator: `:pserver:...`, `:ext:...` or a
/// local path.
fn is_cvs_root(body: &[u8]) -> bool {
    body.starts_with(b":") || body.starts_with(b"/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_config_signature() {
        assert!(is_git_config(b"[core]\n\trepositoryformatversion = 0\n"));
        assert!(!is_git_config(b"<html>not found</html>"));
    }

    #[test]
    fn svn_sqlite_and_entries_formats() {
        assert!(is_svn_metadata(b"SQLite format 3\0rest"));
        assert!(is_svn_metadata(b"12\ndir\nsvn://example.com/repo\n"));
        assert!(!is_svn_metadata(b"<html>soft 404</html>"));
        assert!(!is_svn_metadata(b"12345 results found\n"));
    }

    #[test]
    fn cvs_root_locators() {
        assert!(is_cvs_root(b":pserver:anonymous@cvs.example.com:/cvsroot"));
        assert!(is_cvs_root(b"/var/lib/cvs"));
        assert!(!is_cvs_root(b"404 page"));
    }
}
