//! Registry counters.
//!
//! Lookups are counted lock-free with `AtomicU64`; [`RegistryStats`] is a
//! point-in-time snapshot that can be rendered as Prometheus text.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Hit/miss counters for accessor lookups.
#[derive(Debug, Default)]
pub(crate) struct RegistryCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RegistryCounters {
    pub(crate) const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Snapshot of registry size and lookup counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Number of scopes, including `"global"`.
    pub scopes: usize,
    /// Number of materialized variants across all scopes.
    pub variants: usize,
    /// Accessor lookups served from the cache.
    pub hits: u64,
    /// Accessor lookups that materialized a new variant.
    pub misses: u64,
}

impl RegistryStats {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP exnum_scopes Scopes in the registry\n\
             # TYPE exnum_scopes gauge\n\
             exnum_scopes {}\n\
             # HELP exnum_variants Materialized error variants\n\
             # TYPE exnum_variants gauge\n\
             exnum_variants {}\n\
             # HELP exnum_lookups_total Accessor lookups by outcome\n\
             # TYPE exnum_lookups_total counter\n\
             exnum_lookups_total{{outcome=\"hit\"}} {}\n\
             exnum_lookups_total{{outcome=\"miss\"}} {}\n",
            self.scopes, self.variants, self.hits, self.misses,
        )
    }
}
