//! Lazy, name-indexed access to error variants.
//!
//! An [`Accessor`] is configured with a scope and a base `range`. Asking it
//! for a name materializes the variant on first access and returns the cached
//! descriptor afterwards:
//!
//! ```
//! use exnum_core::{AccessorOptions, Registry};
//!
//! let registry = Registry::new();
//! let http = registry.accessor(AccessorOptions::scoped("http").with_range(400));
//!
//! let [bad_request, not_found] = http.variants([0, 4]);
//! assert_eq!(bad_request.code().value(), Some(400));
//! assert_eq!(not_found.code().value(), Some(404));
//! assert_eq!(http.variant(4), not_found);
//! ```
//!
//! # Reserved keys
//!
//! [`Accessor::lookup`] intercepts exactly two string keys:
//!
//! | Key        | Result                                              |
//! |------------|-----------------------------------------------------|
//! | `"length"` | [`Member::Capacity`] with [`MAX_ERROR_DEFS`] (100)  |
//! | `"scoped"` | [`Member::Registered`], all variants in the scope   |
//!
//! [`Accessor::variant`] never intercepts them.

use serde::{Deserialize, Serialize};

use crate::code::{allocate, Key};
use crate::error::{ExnumError, Result};
use crate::registry::{registry, Registry, GLOBAL_SCOPE};
use crate::variant::Variant;

/// Reserved key reporting the capacity constant.
pub const LENGTH_KEY: &str = "length";

/// Reserved key listing the variants registered in the accessor's scope.
pub const SCOPED_KEY: &str = "scoped";

/// Capacity reported through [`LENGTH_KEY`]. A constant, not a live count.
pub const MAX_ERROR_DEFS: usize = 100;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Scope and base offset of an accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorOptions {
    /// Scope name; `None` means `"global"`.
    #[serde(default)]
    pub scope: Option<String>,
    /// Added to each key's numeric value to form its code.
    #[serde(default)]
    pub range: i64,
}

impl AccessorOptions {
    /// Options for a named scope with range `0`.
    #[must_use]
    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            range: 0,
        }
    }

    /// Replace the range.
    #[must_use]
    pub fn with_range(mut self, range: i64) -> Self {
        self.range = range;
        self
    }
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// Result of [`Accessor::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// An ordinary variant.
    Variant(Variant),
    /// Answer to [`LENGTH_KEY`].
    Capacity(usize),
    /// Answer to [`SCOPED_KEY`].
    Registered(Vec<Variant>),
}

impl Member {
    /// The variant, if this member is one.
    #[must_use]
    pub fn into_variant(self) -> Option<Variant> {
        match self {
            Self::Variant(v) => Some(v),
            Self::Capacity(_) | Self::Registered(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Accessor
// ---------------------------------------------------------------------------

/// Get-or-create façade over one scope of a [`Registry`].
#[derive(Debug, Clone)]
pub struct Accessor<'r> {
    registry: &'r Registry,
    options: AccessorOptions,
}

impl<'r> Accessor<'r> {
    /// Accessor over `registry` with the given options.
    #[must_use]
    pub fn new(registry: &'r Registry, options: AccessorOptions) -> Self {
        Self { registry, options }
    }

    /// The effective scope name.
    #[must_use]
    pub fn scope(&self) -> &str {
        self.options.scope.as_deref().unwrap_or(GLOBAL_SCOPE)
    }

    /// The configured range.
    #[must_use]
    pub fn range(&self) -> i64 {
        self.options.range
    }

    /// The configured options.
    #[must_use]
    pub fn options(&self) -> &AccessorOptions {
        &self.options
    }

    /// Map-like access honoring the two reserved keys.
    pub fn lookup(&self, key: impl Into<Key>) -> Member {
        let key = key.into();
        if let Key::Name(name) = &key {
            match name.as_str() {
                LENGTH_KEY => return Member::Capacity(self.capacity()),
                SCOPED_KEY => return Member::Registered(self.scoped()),
                _ => {}
            }
        }
        Member::Variant(self.resolve(&key))
    }

    /// Get or create the variant for `key`.
    pub fn variant(&self, key: impl Into<Key>) -> Variant {
        self.resolve(&key.into())
    }

    /// Like [`Accessor::variant`], but refuse to materialize a variant
    /// without a numeric code. Variants already in the registry are returned
    /// as they are.
    ///
    /// # Errors
    ///
    /// Returns [`ExnumError::UnassignedCode`] when `key` is not cached and
    /// has no numeric value.
    pub fn try_variant(&self, key: impl Into<Key>) -> Result<Variant> {
        let key = key.into();
        let name = key.name();
        if let Some(found) = self.registry.get(&name, self.scope()) {
            return Ok(found);
        }
        if !allocate(self.options.range, &key).is_assigned() {
            return Err(ExnumError::UnassignedCode {
                scope: self.scope().to_string(),
                name: name.into_owned(),
            });
        }
        Ok(self.resolve(&key))
    }

    /// Get or create several variants at once.
    pub fn variants<K, const N: usize>(&self, keys: [K; N]) -> [Variant; N]
    where
        K: Into<Key>,
    {
        keys.map(|k| self.variant(k))
    }

    /// The capacity constant, [`MAX_ERROR_DEFS`].
    #[must_use]
    pub fn capacity(&self) -> usize {
        MAX_ERROR_DEFS
    }

    /// Variants currently registered in this accessor's scope.
    #[must_use]
    pub fn scoped(&self) -> Vec<Variant> {
        self.registry.scoped(self.scope())
    }

    fn resolve(&self, key: &Key) -> Variant {
        let name = key.name();
        self.registry.get_or_insert_with(&name, self.scope(), || {
            Variant::build(
                name.to_string(),
                self.options.scope.clone(),
                allocate(self.options.range, key),
                self.options.range,
                self.registry.config().trace_construction,
            )
        })
    }
}

/// Accessor over the process-wide registry.
#[must_use]
pub fn num(options: AccessorOptions) -> Accessor<'static> {
    registry().accessor(options)
}
