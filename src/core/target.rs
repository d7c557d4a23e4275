// src/core/target.rs

use crate::core::error::ConfigError;
use url::Url;

/// Suppression flags feeding the target resolver, straight from the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemeFlags {
    pub no_http: bool,
    pub no_https: bool,
    pub no_www: bool,
}

/// Expand a user-supplied host into the ordered, de-duplicated list of base
/// URLs to test: the cross product of {http, https} × {bare, www}, minus
/// whatever the flags suppress.
///
/// Scheme-major order (http bare, http www, https bare, https www) is part of
/// the deterministic-output contract. A host that already carries an explicit
/// scheme short-circuits to that single URL. The www variant is skipped when
/// the host already starts with `www.` or is an IP literal.
pub fn expand_target(host: &str, flags: SchemeFlags) -> Result<Vec<String>, ConfigError> {
    let host = host.trim();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidHost(host.to_string()));
    }

    // Explicit scheme: use as-is, the cross product degenerates to one URL.
    if host.contains("://") {
        let url = Url::parse(host).map_err(|_| ConfigError::InvalidHost(host.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidHost(format!(
                    "{host} (unsupported scheme {other})"
                )));
            }
        }
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidHost(host.to_string()));
        }
        return Ok(vec![host.trim_end_matches('/').to_string()]);
    }

    if host.contains('/') {
        return Err(ConfigError::InvalidHost(host.to_string()));
    }
    if flags.no_http && flags.no_https {
        return Err(ConfigError::NoSchemesEnabled(host.to_string()));
    }
    // Parse via a throwaway URL to reject hosts reqwest would choke on later.
    if Url::parse(&format!("http://{host}")).is_err() {
        return Err(ConfigError::InvalidHost(host.to_string()));
    }

    let mut urls = Vec::with_capacity(4);
    let with_www = !flags.no_www && !host.starts_with("www.") && !is_ip_literal(host);
    for scheme in ["http", "https"] {
        if (scheme == "http" && flags.no_http) || (scheme == "https" && flags.no_https) {
            continue;
        }
        urls.push(format!("{scheme}://{host}"));
        if with_www {
            urls.push(format!("{scheme}://www.{host}"));
        }
    }
    urls.dedup();
    Ok(urls)
}

/// Extract the bare hostname (no port) from a base URL, for DNS-level probes.
pub fn host_of(base_url: &str) -> Option<String> {
    Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

// A www label never resolves in front of a raw address.
fn is_ip_literal(host: &str) -> bool {
    if host.starts_with('[') {
        return true; // bracketed IPv6, possibly with port
    }
    let bare = host.rsplit_once(':').map_or(host, |(h, port)| {
        if port.chars().all(|c| c.is_ascii_digit()) {
            h
        } else {
            host
        }
    });
    bare.parse::<std::net::IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_produce_four_urls() {
        let urls = expand_target("example.com", SchemeFlags::default()).unwrap();
        assert_eq!(
            urls,
            [
                "http://example.com",
                "http://www.example.com",
                "https://example.com",
                "https://www.example.com",
            ]
        );
    }

    #[test]
    fn suppressing_down_to_one_url() {
        let flags = SchemeFlags {
            no_http: true,
            no_www: true,
            ..Default::default()
        };
        let urls = expand_target("localhost:4443", flags).unwrap();
        assert_eq!(urls, ["https://localhost:4443"]);
    }

    #[test]
    fn www_host_gets_no_second_www() {
        let urls = expand_target("www.example.com", SchemeFlags::default()).unwrap();
        assert_eq!(urls, ["http://www.example.com", "https://www.example.com"]);
    }

    #[test]
    fn ip_literal_gets_no_www() {
        let urls = expand_target("192.168.1.10", SchemeFlags::default()).unwrap();
        assert_eq!(urls, ["http://192.168.1.10", "https://192.168.1.10"]);
        let urls = expand_target("192.168.1.10:8080", SchemeFlags::default()).unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn explicit_scheme_degenerates_to_single_url() {
        let urls = expand_target("https://example.com", SchemeFlags::default()).unwrap();
        assert_eq!(urls, ["https://example.com"]);
    }

    #[test]
    fn both_schemes_disabled_is_config_error() {
        let flags = SchemeFlags {
            no_http: true,
            no_https: true,
            ..Default::default()
        };
        assert!(matches!(
            expand_target("example.com", flags),
            Err(ConfigError::NoSchemesEnabled(_))
        ));
    }

    #[test]
    fn invalid_hosts_are_rejected() {
        assert!(expand_target("", SchemeFlags::default()).is_err());
        assert!(expand_target("bad host", SchemeFlags::default()).is_err());
        assert!(expand_target("host/with/path", SchemeFlags::default()).is_err());
        assert!(expand_target("ftp://example.com", SchemeFlags::default()).is_err());
    }

    #[test]
    fn host_of_strips_scheme_and_port() {
        assert_eq!(host_of("https://localhost:4443").as_deref(), Some("localhost"));
        assert_eq!(host_of("http://example.com").as_deref(), Some("example.com"));
    }
}
