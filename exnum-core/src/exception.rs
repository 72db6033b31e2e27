//! The base exception family and narrowing over arbitrary error values.
//!
//! Every error produced by the registry is an [`Exception`]. A specific
//! [`Variant`] narrows to its own instances only; the associated functions
//! on `Exception` narrow to the whole family:
//!
//! ```
//! use exnum_core::{AccessorOptions, Exception, Registry};
//!
//! let registry = Registry::new();
//! let errors = registry.accessor(AccessorOptions::default());
//! let not_found = errors.variant("NotFound");
//! let denied = errors.variant("NotAuthorized");
//!
//! let err = not_found.construct(["user", "42", "missing"]);
//! assert!(not_found.is(&err));
//! assert!(!denied.is(&err));
//! assert!(Exception::is(&err));
//! assert_eq!(err.message(), "user 42 missing");
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::code::Code;
use crate::variant::Variant;

/// Name reported for exceptions that belong to no variant.
pub const BASE_NAME: &str = "Exception";

// ---------------------------------------------------------------------------
// Exception
// ---------------------------------------------------------------------------

/// An error instance: a message plus the code and scope of its variant.
#[derive(Clone, Error)]
#[error("{message}")]
pub struct Exception {
    message: String,
    code: Code,
    scope: Option<String>,
    variant: Option<Variant>,
    location: &'static Location<'static>,
}

impl Exception {
    /// Construct a base-family exception that belongs to no variant.
    ///
    /// The message is `parts` joined by a single space; the code is
    /// [`Code::BASE`].
    #[track_caller]
    pub fn new<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Self {
            message: join_parts(parts),
            code: Code::BASE,
            scope: None,
            variant: None,
            location: Location::caller(),
        }
    }

    pub(crate) fn from_variant(
        variant: &Variant,
        message: String,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            message,
            code: variant.code(),
            scope: variant.scope().map(str::to_string),
            variant: Some(variant.clone()),
            location,
        }
    }

    /// True for any exception, whichever variant produced it.
    pub fn is<V: Narrow + ?Sized>(value: &V) -> bool {
        value.narrow().is_some()
    }

    /// Invoke `callback` with the narrowed exception if `value` is one.
    pub fn match_error<V, R, F>(value: &V, callback: F) -> Option<R>
    where
        V: Narrow + ?Sized,
        F: FnOnce(&Exception) -> R,
    {
        value.narrow().map(callback)
    }

    /// Construct a base exception and raise it as a panic payload.
    ///
    /// Recover it with [`std::panic::catch_unwind`] and classify the payload
    /// with [`Exception::is`] or [`Variant::is`].
    #[track_caller]
    pub fn throw<I>(parts: I) -> !
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        std::panic::panic_any(Self::new(parts))
    }

    /// Construct a base exception as an `Err`, for `?` propagation.
    ///
    /// # Errors
    ///
    /// Always returns `Err`.
    #[track_caller]
    pub fn fail<T, I>(parts: I) -> Result<T, Exception>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Err(Self::new(parts))
    }

    /// The joined message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The code copied from the variant at construction time.
    #[must_use]
    pub fn code(&self) -> Code {
        self.code
    }

    /// The scope of a scoped variant.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The variant this exception was constructed through.
    #[must_use]
    pub fn variant(&self) -> Option<&Variant> {
        self.variant.as_ref()
    }

    /// Variant name, or [`BASE_NAME`] for base-family exceptions.
    #[must_use]
    pub fn name(&self) -> &str {
        self.variant.as_ref().map_or(BASE_NAME, Variant::name)
    }

    /// Source location of the construction.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Structured diagnostic view of this exception.
    #[must_use]
    pub fn report(&self) -> DebugReport {
        DebugReport {
            name: self.name().to_string(),
            message: self.message.clone(),
            code: self.code,
            scope: self.scope.clone(),
            metadata: DebugMetadata {
                file: self.location.file().to_string(),
                line: self.location.line(),
                column: self.location.column(),
                range: self.variant.as_ref().map_or(0, Variant::range),
            },
        }
    }

    /// Emit the debug report as a `tracing` event and hand the instance
    /// back, so `Exception::new(..).debug()` chains like [`Variant::debug`].
    #[must_use]
    pub fn debug(self) -> Self {
        self.report().emit();
        self
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Exception");
        d.field("name", &self.name());
        d.field("message", &self.message);
        d.field("code", &self.code);
        if let Some(scope) = &self.scope {
            d.field("scope", scope);
        }
        d.field(
            "location",
            &format_args!("{}:{}", self.location.file(), self.location.line()),
        );
        d.finish()
    }
}

pub(crate) fn join_parts<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    parts
        .into_iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Debug report
// ---------------------------------------------------------------------------

/// Diagnostic information about one exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugReport {
    /// Variant name.
    pub name: String,
    /// Joined message.
    pub message: String,
    /// Allocated code.
    pub code: Code,
    /// Scope, for scoped variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Origin and allocation metadata.
    pub metadata: DebugMetadata,
}

/// Origin location and range of a [`DebugReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugMetadata {
    /// Source file of the construction site.
    pub file: String,
    /// Line of the construction site.
    pub line: u32,
    /// Column of the construction site.
    pub column: u32,
    /// Base offset of the accessor that materialized the variant.
    pub range: i64,
}

impl DebugReport {
    /// Emit this report at `info` level on the `exnum::debug` target.
    pub fn emit(&self) {
        info!(
            target: "exnum::debug",
            variant = %self.name,
            msg = %self.message,
            code = %self.code,
            scope = ?self.scope,
            file = %self.metadata.file,
            line = self.metadata.line,
            range = self.metadata.range,
            "exception debug"
        );
    }

    /// Render as a single-line JSON object.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if encoding fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Narrowing
// ---------------------------------------------------------------------------

/// Values that may hold an [`Exception`].
///
/// Implemented for exceptions themselves, trait-object errors, panic
/// payloads, and `Option`/`Result`/`Box` wrappers of those.
pub trait Narrow {
    /// The exception inside `self`, if any.
    fn narrow(&self) -> Option<&Exception>;
}

impl Narrow for Exception {
    fn narrow(&self) -> Option<&Exception> {
        Some(self)
    }
}

impl Narrow for dyn StdError + 'static {
    fn narrow(&self) -> Option<&Exception> {
        self.downcast_ref::<Exception>()
    }
}

impl Narrow for dyn StdError + Send + 'static {
    fn narrow(&self) -> Option<&Exception> {
        self.downcast_ref::<Exception>()
    }
}

impl Narrow for dyn StdError + Send + Sync + 'static {
    fn narrow(&self) -> Option<&Exception> {
        self.downcast_ref::<Exception>()
    }
}

impl Narrow for dyn Any {
    fn narrow(&self) -> Option<&Exception> {
        self.downcast_ref::<Exception>()
    }
}

impl Narrow for dyn Any + Send {
    fn narrow(&self) -> Option<&Exception> {
        self.downcast_ref::<Exception>()
    }
}

impl<T: Narrow + ?Sized> Narrow for Box<T> {
    fn narrow(&self) -> Option<&Exception> {
        (**self).narrow()
    }
}

impl<T: Narrow> Narrow for Option<T> {
    fn narrow(&self) -> Option<&Exception> {
        self.as_ref().and_then(Narrow::narrow)
    }
}

impl<T, E: Narrow> Narrow for Result<T, E> {
    fn narrow(&self) -> Option<&Exception> {
        self.as_ref().err().and_then(Narrow::narrow)
    }
}
