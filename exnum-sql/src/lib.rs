//! # exnum-sql: named placeholders for positional SQL drivers
//!
//! Rewrites `$identifier` placeholders into the 1-based positional form
//! (`$1`, `$2`, …) that PostgreSQL prepared statements expect, and collects
//! the matching parameter list:
//!
//! ```
//! use std::collections::HashMap;
//! use exnum_sql::statement;
//!
//! let sql = statement("SELECT * FROM users WHERE userId = $userId OR createdBy = $userId");
//! let values = HashMap::from([("userId".to_string(), 123)]);
//! let prepared = sql.prepare(&values).unwrap();
//!
//! assert_eq!(prepared.query, "SELECT * FROM users WHERE userId = $1 OR createdBy = $1");
//! assert_eq!(prepared.params, vec![123]);
//! ```
//!
//! Duplicate names share one position; positions follow first occurrence.
//! Every referenced name must be bound, though the bound value may itself
//! be a null.

pub mod error;
pub mod statement;

pub use error::SqlError;
pub use statement::{statement, Bindings, Prepared, Statement};
