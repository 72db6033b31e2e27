//! Error variant descriptors.
//!
//! A [`Variant`] is a cheap, cloneable handle to one named, coded kind of
//! error. Handles compare by identity: two handles are equal only if they
//! refer to the same materialization, so narrowing with [`Variant::is`]
//! never confuses the same name in different scopes or registries.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::code::Code;
use crate::exception::{join_parts, Exception, Narrow};

/// Process-unique identifier of a materialized variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantId(u64);

impl VariantId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct VariantInner {
    id: VariantId,
    name: String,
    scope: Option<String>,
    code: Code,
    range: i64,
    trace_construction: bool,
}

/// Descriptor of one error variant.
#[derive(Clone)]
pub struct Variant {
    inner: Arc<VariantInner>,
}

impl Variant {
    /// Build a fresh descriptor. Callers go through the registry so that a
    /// `(scope, name)` pair is only ever built once.
    pub(crate) fn build(
        name: String,
        scope: Option<String>,
        code: Code,
        range: i64,
        trace_construction: bool,
    ) -> Self {
        Self {
            inner: Arc::new(VariantInner {
                id: VariantId::next(),
                name,
                scope,
                code,
                range,
                trace_construction,
            }),
        }
    }

    /// Identity of this materialization.
    #[must_use]
    pub fn id(&self) -> VariantId {
        self.inner.id
    }

    /// Variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Scope named by the accessor that materialized this variant, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.inner.scope.as_deref()
    }

    /// Allocated code.
    #[must_use]
    pub fn code(&self) -> Code {
        self.inner.code
    }

    /// Base offset of the accessor that materialized this variant.
    #[must_use]
    pub fn range(&self) -> i64 {
        self.inner.range
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Construct an instance whose message is `parts` joined by a space.
    #[track_caller]
    pub fn construct<I>(&self, parts: I) -> Exception
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let location = Location::caller();
        let exception = Exception::from_variant(self, join_parts(parts), location);
        if self.inner.trace_construction {
            trace!(
                variant = %self,
                code = %self.inner.code,
                file = location.file(),
                line = location.line(),
                "exception constructed"
            );
        }
        exception
    }

    /// Construct an instance and raise it as a panic payload.
    #[track_caller]
    pub fn throw<I>(&self, parts: I) -> !
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        std::panic::panic_any(self.construct(parts))
    }

    /// Construct an instance as an `Err`, for `?` propagation.
    ///
    /// # Errors
    ///
    /// Always returns `Err`.
    #[track_caller]
    pub fn fail<T, I>(&self, parts: I) -> Result<T, Exception>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Err(self.construct(parts))
    }

    // -----------------------------------------------------------------------
    // Narrowing
    // -----------------------------------------------------------------------

    /// True iff `value` holds an exception constructed through this exact
    /// descriptor.
    pub fn is<V: Narrow + ?Sized>(&self, value: &V) -> bool {
        value
            .narrow()
            .and_then(Exception::variant)
            .is_some_and(|v| v == self)
    }

    /// Invoke `callback` with the narrowed exception iff [`Variant::is`]
    /// holds; otherwise return `None` without invoking it.
    pub fn match_error<V, R, F>(&self, value: &V, callback: F) -> Option<R>
    where
        V: Narrow + ?Sized,
        F: FnOnce(&Exception) -> R,
    {
        value
            .narrow()
            .filter(|e| e.variant().is_some_and(|v| v == self))
            .map(callback)
    }

    /// Emit the debug report of `instance` and hand it back.
    pub fn debug(&self, instance: Exception) -> Exception {
        instance.debug()
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Variant {}

impl Hash for Variant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Variant");
        d.field("id", &self.inner.id.0);
        d.field("name", &self.inner.name);
        if let Some(scope) = &self.inner.scope {
            d.field("scope", scope);
        }
        d.field("code", &self.inner.code);
        d.field("range", &self.inner.range);
        d.finish()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.scope {
            Some(scope) => write!(f, "{scope}::{}", self.inner.name),
            None => f.write_str(&self.inner.name),
        }
    }
}
