//! The scoped registry: scope name → variant name → [`Variant`].
//!
//! Variants are memoized so that a `(scope, name)` pair maps to exactly one
//! descriptor for the registry's lifetime. Nothing is ever evicted.
//!
//! One process-wide registry is created lazily by [`registry()`]; callers
//! may also build private registries with [`Registry::new`], which is
//! mostly useful for isolation in tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use parking_lot::RwLock;
use tracing::debug;

use crate::accessor::{Accessor, AccessorOptions};
use crate::config::RegistryConfig;
use crate::metrics::{RegistryCounters, RegistryStats};
use crate::variant::Variant;

/// Name of the default scope, present in every registry from creation.
pub const GLOBAL_SCOPE: &str = "global";

/// Two-level, identity-preserving variant store.
#[derive(Debug)]
pub struct Registry {
    scoped: RwLock<HashMap<String, HashMap<String, Variant>>>,
    config: RegistryConfig,
    counters: RegistryCounters,
}

impl Registry {
    /// Create a registry holding only the empty `"global"` scope.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with explicit settings.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        let mut scoped = HashMap::new();
        scoped.insert(GLOBAL_SCOPE.to_string(), HashMap::new());
        Self {
            scoped: RwLock::new(scoped),
            config,
            counters: RegistryCounters::new(),
        }
    }

    /// Registry settings.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// An accessor over this registry.
    #[must_use]
    pub fn accessor(&self, options: AccessorOptions) -> Accessor<'_> {
        Accessor::new(self, options)
    }

    // -----------------------------------------------------------------------
    // Store
    // -----------------------------------------------------------------------

    /// Insert or overwrite the variant for `(scope, name)`, creating the
    /// scope if needed.
    pub fn set(&self, name: impl Into<String>, variant: Variant, scope: &str) {
        self.scoped
            .write()
            .entry(scope.to_string())
            .or_default()
            .insert(name.into(), variant);
    }

    /// Look up `(scope, name)` without side effects.
    #[must_use]
    pub fn get(&self, name: &str, scope: &str) -> Option<Variant> {
        self.scoped.read().get(scope)?.get(name).cloned()
    }

    /// Return the cached variant for `(scope, name)`, or build it with
    /// `make` and store it. The check and the insert happen under one
    /// write lock, so racing first accesses agree on a single variant.
    pub(crate) fn get_or_insert_with<F>(&self, name: &str, scope: &str, make: F) -> Variant
    where
        F: FnOnce() -> Variant,
    {
        if let Some(found) = self.get(name, scope) {
            self.counters.hit();
            return found;
        }

        let mut scoped = self.scoped.write();
        let inner = scoped.entry(scope.to_string()).or_default();
        if let Some(found) = inner.get(name) {
            self.counters.hit();
            return found.clone();
        }

        let variant = make();
        debug!(
            scope,
            name,
            code = %variant.code(),
            range = variant.range(),
            "Materialized error variant"
        );
        inner.insert(name.to_string(), variant.clone());
        self.counters.miss();
        variant
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Snapshot of every scope and its variants, sorted by name.
    #[must_use]
    pub fn scopes(&self) -> BTreeMap<String, BTreeMap<String, Variant>> {
        self.scoped
            .read()
            .iter()
            .map(|(scope, inner)| {
                let variants = inner
                    .iter()
                    .map(|(name, v)| (name.clone(), v.clone()))
                    .collect();
                (scope.clone(), variants)
            })
            .collect()
    }

    /// All variants registered in `scope`, sorted by name.
    #[must_use]
    pub fn scoped(&self, scope: &str) -> Vec<Variant> {
        let scoped = self.scoped.read();
        let Some(inner) = scoped.get(scope) else {
            return Vec::new();
        };
        let mut variants: Vec<Variant> = inner.values().cloned().collect();
        variants.sort_by(|a, b| a.name().cmp(b.name()));
        variants
    }

    /// Whether `scope` exists.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scoped.read().contains_key(scope)
    }

    /// Current size and lookup counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let scoped = self.scoped.read();
        RegistryStats {
            scopes: scoped.len(),
            variants: scoped.values().map(HashMap::len).sum(),
            hits: self.counters.hits(),
            misses: self.counters.misses(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide registry, created on first use.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}
