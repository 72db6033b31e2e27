//! Code allocation for error variants.
//!
//! A variant's code is `range + numeric(key)`, computed once when the variant
//! is first materialized. Keys that are not numeric, and sums that overflow
//! `i64`, receive [`Code::UNASSIGNED`] regardless of the range.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Code
// ---------------------------------------------------------------------------

/// Integer classification number of an error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(Option<i64>);

impl Code {
    /// Sentinel for variants whose name has no numeric value.
    pub const UNASSIGNED: Code = Code(None);

    /// Code carried by base-family exceptions that belong to no variant.
    pub const BASE: Code = Code(Some(0));

    /// Wrap a concrete code value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(Some(value))
    }

    /// The numeric value, or `None` for [`Code::UNASSIGNED`].
    #[must_use]
    pub const fn value(self) -> Option<i64> {
        self.0
    }

    /// The numeric value, with `-1` standing in for [`Code::UNASSIGNED`].
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self.0 {
            Some(v) => v,
            None => -1,
        }
    }

    /// Whether a numeric code was allocated.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("unassigned"),
        }
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A variant key: either a name or an integer index.
///
/// Index keys are stringified for registry storage, so `Key::Index(3)` and
/// `Key::Name("3")` address the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Named variant, e.g. `"NotFound"`.
    Name(String),
    /// Numerically indexed variant.
    Index(i64),
}

impl Key {
    /// The registry name of this key.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Name(name) => Cow::Borrowed(name),
            Self::Index(idx) => Cow::Owned(idx.to_string()),
        }
    }

    /// Numeric value used for code allocation.
    ///
    /// Names count as numeric when they parse as a base-10 `i64` after
    /// trimming ASCII whitespace. The empty name is not numeric.
    #[must_use]
    pub fn numeric(&self) -> Option<i64> {
        match self {
            Self::Index(idx) => Some(*idx),
            Self::Name(name) => name.trim_ascii().parse().ok(),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<i64> for Key {
    fn from(idx: i64) -> Self {
        Self::Index(idx)
    }
}

impl From<i32> for Key {
    fn from(idx: i32) -> Self {
        Self::Index(i64::from(idx))
    }
}

impl From<u32> for Key {
    fn from(idx: u32) -> Self {
        Self::Index(i64::from(idx))
    }
}

impl From<usize> for Key {
    fn from(idx: usize) -> Self {
        i64::try_from(idx).map_or_else(|_| Self::Name(idx.to_string()), Self::Index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Compute the code for `key` under a base offset of `range`.
#[must_use]
pub fn allocate(range: i64, key: &Key) -> Code {
    key.numeric()
        .and_then(|n| range.checked_add(n))
        .map_or(Code::UNASSIGNED, Code::new)
}
