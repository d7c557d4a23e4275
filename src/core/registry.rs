// src/core/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::{ConfigError, ProbeError};
use crate::core::models::Finding;
use crate::core::transport::TargetContext;

/// How often a probe runs for a given target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeScope {
    /// Once per base URL (the default). Path checks belong here.
    PerBaseUrl,
    /// Once per distinct host, on its first reachable base URL. DNS-level
    /// checks belong here; running them per scheme would duplicate findings.
    PerHost,
}

/// A single detection routine testing for one class of exposure.
///
/// Probes are stateless: they own no mutable state and may be invoked
/// concurrently. Transport failures must surface as `ProbeError` values (never
/// panics); the orchestrator turns them into "no finding" for the pair.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Registered check name, unique across the registry.
    fn name(&self) -> &'static str;

    fn scope(&self) -> ProbeScope {
        ProbeScope::PerBaseUrl
    }

    /// Perform one detection attempt against the target.
    async fn run(&self, ctx: &TargetContext) -> Result<Option<Finding>, ProbeError>;
}

/// Immutable, ordered index of all available checks.
///
/// Built once at startup via [`CheckRegistry::builtin`] and read-only
/// afterwards. Registration order is the output order contract, so the
/// registry keeps a vector alongside the name index.
pub struct CheckRegistry {
    probes: Vec<Arc<dyn Probe>>,
    by_name: HashMap<&'static str, usize>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self {
            probes: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// The full built-in check table, in canonical order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::core::probes::register_all(&mut registry);
        registry
    }

    /// Register a probe. Duplicate names are a programmer error and abort
    /// startup; the name doubles as the CLI selection key and output tag.
    pub fn register(&mut self, probe: Arc<dyn Probe>) {
        let name = probe.name();
        assert!(
            !self.by_name.contains_key(name),
            "duplicate check name registered: {name}"
        );
        self.by_name.insert(name, self.probes.len());
        self.probes.push(probe);
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Probe>> {
        self.by_name.get(name).map(|&i| self.probes[i].clone())
    }

    /// All probes in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Probe>> {
        self.probes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.probes.iter().map(|p| p.name())
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Apply `-t`/`-x` style selection. Unknown names in either list fail
    /// with a `ConfigError` so operator typos never silently skip a check.
    /// The result preserves registry order regardless of how the selection
    /// lists were written.
    pub fn select(
        &self,
        only: &[String],
        exclude: &[String],
    ) -> Result<Vec<Arc<dyn Probe>>, ConfigError> {
        for name in only.iter().chain(exclude.iter()) {
            if !self.by_name.contains_key(name.as_str()) {
                return Err(ConfigError::UnknownCheck(name.clone()));
            }
        }
        let selected = self
            .probes
            .iter()
            .filter(|p| only.is_empty() || only.iter().any(|n| n == p.name()))
            .filter(|p| !exclude.iter().any(|n| n == p.name()))
            .cloned()
            .collect();
        Ok(selected)
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyProbe {
        name: &'static str,
    }

    #[async_trait::async_trait]
    impl Probe for DummyProbe {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn run(&self, _ctx: &TargetContext) -> Result<Option<Finding>, ProbeError> {
            Ok(None)
        }
    }

    fn registry_with(names: &[&'static str]) -> CheckRegistry {
        let mut registry = CheckRegistry::new();
        for name in names {
            registry.register(Arc::new(DummyProbe { name }));
        }
        registry
    }

    #[test]
    fn lookup_finds_registered_probe() {
        let registry = registry_with(&["a", "b"]);
        assert!(registry.lookup("a").is_some());
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate check name")]
    fn duplicate_registration_panics() {
        registry_with(&["a", "a"]);
    }

    #[test]
    fn select_unknown_name_is_config_error() {
        let registry = registry_with(&["a"]);
        let err = registry.select(&["bogus".into()], &[]).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownCheck(n) if n == "bogus"));
        let err = registry.select(&[], &["bogus".into()]).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownCheck(_)));
    }

    #[test]
    fn select_preserves_registry_order() {
        let registry = registry_with(&["a", "b", "c"]);
        let picked = registry
            .select(&["c".into(), "a".into()], &[])
            .unwrap();
        let names: Vec<_> = picked.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn exclude_removes_probe() {
        let registry = registry_with(&["a", "b", "c"]);
        let picked = registry.select(&[], &["b".into()]).unwrap();
        let names: Vec<_> = picked.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn builtin_registry_has_unique_ordered_names() {
        let registry = CheckRegistry::builtin();
        assert!(registry.len() >= 20);
        // Names the fixture test suite depends on.
        for name in ["git_dir", "backup_archive", "deadjoe", "coredump", "ds_store"] {
            assert!(registry.lookup(name).is_some(), "missing builtin check {name}");
        }
    }
}
