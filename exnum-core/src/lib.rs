//! # exnum core library
//!
//! A lazily-populated, scope-partitioned registry of error variants.
//!
//! Each variant is identified by a name, carries a stable numeric [`Code`],
//! and is materialized on first access. Repeated lookups of the same
//! `(scope, name)` return the identical [`Variant`], so narrowing with
//! [`Variant::is`] / [`Variant::match_error`] is identity-based:
//!
//! ```
//! use std::panic::{catch_unwind, AssertUnwindSafe};
//! use exnum_core::{num, AccessorOptions, Exception, Variant};
//!
//! fn example(missing: &Variant) {
//!     missing.throw(["An unknown exception occurred."]);
//! }
//!
//! let errors = num(AccessorOptions::scoped("doc-example"));
//! let [invalid_params, missing_example] = errors.variants(["InvalidParams", "MissingExample"]);
//!
//! let payload = catch_unwind(AssertUnwindSafe(|| example(&missing_example))).unwrap_err();
//!
//! assert!(invalid_params.match_error(&payload, |_| ()).is_none());
//! let handled = missing_example.match_error(&payload, |e| e.message().to_string());
//! assert_eq!(handled.as_deref(), Some("An unknown exception occurred."));
//! assert!(Exception::is(&payload));
//! ```
//!
//! ## Components
//!
//! - **Code allocation** ([`code`]): `range + numeric(name)`.
//! - **Variants** ([`variant`]): construct / throw / fail / is / match / debug.
//! - **Registry** ([`registry`]): scope → name → variant, one process-wide
//!   instance plus caller-created ones.
//! - **Accessor** ([`accessor`]): get-or-create façade with two reserved
//!   keys, `"length"` and `"scoped"`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod macros;

pub mod accessor;
pub mod code;
pub mod config;
pub mod error;
pub mod exception;
pub mod metrics;
pub mod registry;
pub mod telemetry;
pub mod variant;

pub use accessor::{num, Accessor, AccessorOptions, Member, LENGTH_KEY, MAX_ERROR_DEFS, SCOPED_KEY};
pub use code::{Code, Key};
pub use config::ExnumConfig;
pub use error::ExnumError;
pub use exception::{DebugReport, Exception, Narrow};
pub use metrics::RegistryStats;
pub use registry::{registry, Registry, GLOBAL_SCOPE};
pub use variant::{Variant, VariantId};
