// src/core/mod.rs

/// Typed error taxonomy: fatal configuration errors vs. recoverable
/// per-invocation probe errors.
pub mod error;

/// Data structures shared across the scanner: findings, options, outcomes.
pub mod models;

/// The scan engine: registry-ordered, bounded-concurrency probe execution
/// with deterministic output ordering.
pub mod orchestrator;

/// The built-in detection routines, one module per exposure family.
pub mod probes;

/// The check registry: the immutable name → probe table built at startup.
pub mod registry;

/// Finding output in the fixed text contract, or JSON.
pub mod reporter;

/// Expansion of a user-supplied host into the base URLs to test.
pub mod target;

/// Shared HTTP/DNS handles and fetch helpers used by probes.
pub mod transport;
