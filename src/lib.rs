// src/lib.rs

/// Command-line surface.
pub mod cli;

/// The scan engine: registry, target resolver, orchestrator, probes,
/// reporter.
pub mod core;

/// tracing setup (stderr only; stdout is the finding stream).
pub mod logging;
