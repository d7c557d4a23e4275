// src/cli.rs

use clap::Parser;

/// Scan web hosts for accidentally exposed files and secrets.
#[derive(Parser, Debug)]
#[command(name = "leakhound", version, about)]
pub struct Cli {
    /// Hosts to scan (bare host, host:port, or an explicit http(s):// URL)
    #[arg(required_unless_present = "list_checks")]
    pub hosts: Vec<String>,

    /// Run only the named checks (comma-separated, repeatable)
    #[arg(short = 't', long = "tests", value_delimiter = ',')]
    pub tests: Vec<String>,

    /// Exclude the named checks (comma-separated, repeatable)
    #[arg(short = 'x', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Do not test the www.<host> variants
    #[arg(long)]
    pub nowww: bool,

    /// Do not test http:// URLs
    #[arg(long)]
    pub nohttp: bool,

    /// Do not test https:// URLs
    #[arg(long)]
    pub nohttps: bool,

    /// Per-check timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Maximum concurrently running checks
    #[arg(long, default_value_t = 10)]
    pub concurrency: usize,

    /// Emit findings as a JSON array instead of text lines
    #[arg(short = 'j', long)]
    pub json: bool,

    /// List all available check names and exit
    #[arg(long)]
    pub list_checks: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// User-Agent header to send
    #[arg(long)]
    pub useragent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_and_repeated_tests_flags() {
        let cli = Cli::parse_from(["leakhound", "-t", "git_dir,ds_store", "-t", "coredump", "h"]);
        assert_eq!(cli.tests, ["git_dir", "ds_store", "coredump"]);
        assert_eq!(cli.hosts, ["h"]);
    }

    #[test]
    fn list_checks_needs_no_host() {
        let cli = Cli::parse_from(["leakhound", "--list-checks"]);
        assert!(cli.list_checks);
        assert!(cli.hosts.is_empty());
    }

    #[test]
    fn missing_host_is_a_usage_error() {
        assert!(Cli::try_parse_from(["leakhound"]).is_err());
    }

    #[test]
    fn suppression_flags_parse() {
        let cli = Cli::parse_from(["leakhound", "--nowww", "--nohttp", "localhost:4443"]);
        assert!(cli.nowww && cli.nohttp && !cli.nohttps);
    }
}
