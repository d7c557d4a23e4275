// src/main.rs

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use leakhound::cli::Cli;
use leakhound::core::models::{ScanOptions, ScanOutcome};
use leakhound::core::registry::CheckRegistry;
use leakhound::core::reporter::{OutputFormat, Reporter};
use leakhound::core::target::{SchemeFlags, expand_target};
use leakhound::core::{orchestrator, transport};
use leakhound::logging;

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    let args = Cli::parse();
    color_eyre::install()?;
    logging::initialize_logging(args.debug)?;

    let registry = CheckRegistry::builtin();
    if args.list_checks {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    // All configuration is validated up front; nothing below this block may
    // fail before the first network request goes out.
    let probes = match registry.select(&args.tests, &args.exclude) {
        Ok(probes) => probes,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };
    let flags = SchemeFlags {
        no_http: args.nohttp,
        no_https: args.nohttps,
        no_www: args.nowww,
    };
    let mut targets = Vec::with_capacity(args.hosts.len());
    for host in &args.hosts {
        match expand_target(host, flags) {
            Ok(base_urls) => targets.push((host.clone(), base_urls)),
            Err(e) => {
                eprintln!("error: {e}");
                return Ok(ExitCode::from(2));
            }
        }
    }

    let mut options = ScanOptions {
        timeout: Duration::from_secs(args.timeout.max(1)),
        concurrency: args.concurrency.max(1),
        ..Default::default()
    };
    if let Some(user_agent) = args.useragent {
        options.user_agent = user_agent;
    }
    let options = Arc::new(options);

    let client = transport::build_client(&options)?;
    let resolver = transport::build_resolver();
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut reporter = Reporter::new(format);

    let scan = async {
        let mut total = ScanOutcome::default();
        for (host, base_urls) in &targets {
            let outcome = orchestrator::scan_host(
                host,
                base_urls,
                &probes,
                &client,
                &resolver,
                &options,
                &mut reporter,
            )
            .await?;
            total.merge(outcome);
        }
        Ok::<ScanOutcome, std::io::Error>(total)
    };

    // Ctrl-C drops the scan future, which aborts every in-flight probe task.
    // Findings already written stay written.
    let total = tokio::select! {
        result = scan => result?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("interrupted");
            return Ok(ExitCode::from(130));
        }
    };

    let code = reporter.finish(total.unreachable)?;
    Ok(ExitCode::from(code))
}
