// src/core/probes/client_config.rs
//
// Files written by desktop tools (editors, file managers, FTP clients) that
// end up uploaded with the site. FTP client configs in particular tend to
// carry plaintext credentials.

use std::sync::Arc;

use crate::core::registry::Probe;
use crate::core::transport::body_contains;

use super::PathSignatureProbe;

pub fn ds_store() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("ds_store", &["/.DS_Store"], is_ds_store)
}

pub fn desktopini() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("desktopini", &["/desktop.ini"], is_desktop_ini)
}

pub fn idea() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("idea", &["/.idea/WebServers.xml"], is_idea_webservers)
}

pub fn php_cs_cache() -> Arc<dyn Probe> {
    PathSignatureProbe::probe(
        "php_cs_cache",
        &["/.php_cs.cache", "/.php-cs-fixer.cache"],
        is_php_cs_cache,
    )
}

pub fn sftp_config() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("sftp_config", &["/sftp-config.json"], is_sftp_config)
}

pub fn wsftp_ini() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("wsftp_ini", &["/WS_FTP.ini", "/ws_ftp.ini"], is_wsftp_ini)
}

pub fn filezilla_xml() -> Arc<dyn Probe> {
    PathSignatureProbe::probe(
        "filezilla_xml",
        &["/filezilla.xml", "/sitemanager.xml"],
        is_filezilla_xml,
    )
}

pub fn winscp_ini() -> Arc<dyn Probe> {
    PathSignatureProbe::probe("winscp_ini", &["/winscp.ini", "/WinSCP.ini"], is_winscp_ini)
}

/// macOS Finder metadata: fixed `Bud1` allocator magic after a 4-byte version.
fn is_ds_store(body: &[u8]) -> bool {
    body.starts_with(b"\x00\x00\x00\x01Bud1")
}

/// Windows folder customization. The file is often UTF-16 with a BOM, so the
/// section marker is matched in both encodings.
fn is_desktop_ini(body: &[u8]) -> bool {
    contains_either_encoding(body, "[.ShellClassInfo]")
        || contains_either_encoding(body, "[ViewState]")
}

/// JetBrains deployment config; lists remote servers, sometimes passwords.
fn is_idea_webservers(body: &[u8]) -> bool {
    body_contains(body, "name=\"WebServers\"")
}

/// php-cs-fixer cache: JSON keyed by the fixed `hashes` map.
fn is_php_cs_cache(body: &[u8]) -> bool {
    body.starts_with(b"{") && body_contains(body, "\"hashes\"")
}

/// Sublime SFTP config; `ftp_passive_mode` is one of its default keys.
fn is_sftp_config(body: &[u8]) -> bool {
    body_contains(body, "ftp_passive_mode")
}

/// WS_FTP stores its (weakly obfuscated) site passwords under `[_config_]`.
fn is_wsftp_ini(body: &[u8]) -> bool {
    contains_either_encoding(body, "[_config_]")
}

fn is_filezilla_xml(body: &[u8]) -> bool {
    body_contains(body, "<FileZilla")
}

fn is_winscp_ini(body: &[u8]) -> bool {
    body_contains(body, "[Configuration") || body_contains(body, "[Sessions")
}

/// Match an ASCII needle in either UTF-8 or UTF-16LE bodies. Windows tools
/// routinely write the latter.
fn contains_either_encoding(body: &[u8], needle: &str) -> bool {
    if body_contains(body, needle) {
        return true;
    }
    let wide: Vec<u8> = needle.bytes().flat_map(|b| [b, 0]).collect();
    body.windows(wide.len()).any(|w| w == wide.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ds_store_magic() {
        assert!(is_ds_store(b"\x00\x00\x00\x01Bud1\x00\x00"));
        assert!(!is_ds_store(b"Bud1 without version prefix"));
    }

    #[test]
    fn desktop_ini_utf8_and_utf16() {
        assert!(is_desktop_ini(b"[.ShellClassInfo]\r\nIconResource=shell32.dll,4"));
        let mut utf16 = vec![0xff, 0xfe]; // BOM
        utf16.extend("[.ShellClassInfo]\r\n".bytes().flat_map(|b| [b, 0]));
        assert!(is_desktop_ini(&utf16));
        assert!(!is_desktop_ini(b"<html>desktop.ini blog post</html>"));
    }

    #[test]
    fn ftp_client_signatures() {
        assert!(is_sftp_config(b"{\n  \"type\": \"sftp\",\n  \"ftp_passive_mode\": true\n}"));
        assert!(is_wsftp_ini(b"[_config_]\r\nPWD=V1..."));
        assert!(is_filezilla_xml(b"<?xml version=\"1.0\"?>\n<FileZilla3>"));
        assert!(is_winscp_ini(b"[Configuration\\Security]\r\n"));
    }

    #[test]
    fn idea_and_php_cs_signatures() {
        assert!(is_idea_webservers(b"<component name=\"WebServers\">"));
        assert!(is_php_cs_cache(b"{\"php\":\"8.2\",\"version\":\"3\",\"hashes\":{}}"));
        assert!(!is_php_cs_cache(b"[]"));
    }
}
