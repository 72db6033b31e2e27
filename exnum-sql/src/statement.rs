//! Statement templates and preparation.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

use crate::error::SqlError;

// Names are ASCII word characters only; `$café` binds `caf` and keeps `é`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+)").expect("placeholder pattern is valid"));

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// A name → value source for [`Statement::prepare`].
pub trait Bindings {
    /// Bound value type.
    type Value;

    /// The value bound to `name`, if any.
    fn binding(&self, name: &str) -> Option<&Self::Value>;
}

impl<V, S: BuildHasher> Bindings for HashMap<String, V, S> {
    type Value = V;

    fn binding(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<V> Bindings for BTreeMap<String, V> {
    type Value = V;

    fn binding(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl Bindings for serde_json::Map<String, serde_json::Value> {
    type Value = serde_json::Value;

    fn binding(&self, name: &str) -> Option<&serde_json::Value> {
        self.get(name)
    }
}

impl<V> Bindings for [(&str, V)] {
    type Value = V;

    fn binding(&self, name: &str) -> Option<&V> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }
}

impl<V, const N: usize> Bindings for [(&str, V); N] {
    type Value = V;

    fn binding(&self, name: &str) -> Option<&V> {
        self.as_slice().binding(name)
    }
}

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

/// Output of [`Statement::prepare`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prepared<V> {
    /// The template with positional placeholders.
    pub query: String,
    /// One value per distinct placeholder, in first-occurrence order.
    pub params: Vec<V>,
}

/// A SQL template with `$name` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
}

/// Shorthand for [`Statement::new`].
#[must_use]
pub fn statement(sql: impl Into<String>) -> Statement {
    Statement::new(sql)
}

impl Statement {
    /// Wrap a template.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// The template as written.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Distinct placeholder names in first-occurrence order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.sql) {
            if let Some(m) = caps.get(1) {
                if !names.contains(&m.as_str()) {
                    names.push(m.as_str());
                }
            }
        }
        names
    }

    /// Replace each `$name` with its 1-based position and collect the
    /// bound values.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::MissingPlaceholders`] when any placeholder has no
    /// binding. Every unbound occurrence is listed, so a name used twice
    /// appears twice.
    pub fn prepare<B>(&self, bindings: &B) -> Result<Prepared<B::Value>, SqlError>
    where
        B: Bindings + ?Sized,
        B::Value: Clone,
    {
        let mut params: Vec<B::Value> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut missing: Vec<String> = Vec::new();

        let query = PLACEHOLDER.replace_all(&self.sql, |caps: &Captures<'_>| {
            let name = &caps[1];
            let Some(value) = bindings.binding(name) else {
                missing.push(name.to_string());
                return caps[0].to_string();
            };
            let position = *positions.entry(name.to_string()).or_insert_with(|| {
                params.push(value.clone());
                params.len()
            });
            format!("${position}")
        });

        if !missing.is_empty() {
            debug!(missing = ?missing, "Statement has unbound placeholders");
            return Err(SqlError::MissingPlaceholders(missing));
        }

        debug!(params = params.len(), "Prepared statement");
        Ok(Prepared {
            query: query.into_owned(),
            params,
        })
    }

    /// Prepare from any value that serializes to a map, such as a struct.
    /// Fields serialized as `null` count as bound; skipped fields do not.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Serialization`] or [`SqlError::NotAMap`] when
    /// `values` cannot be turned into a map, and otherwise the errors of
    /// [`Statement::prepare`].
    pub fn prepare_serialized<T>(&self, values: &T) -> Result<Prepared<serde_json::Value>, SqlError>
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(values)? {
            serde_json::Value::Object(map) => self.prepare(&map),
            other => Err(SqlError::NotAMap(kind(&other).to_string())),
        }
    }
}

fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn basic_placeholder_replacement() {
        let sql = statement("SELECT * FROM $table WHERE userId = $userId");
        let result = sql
            .prepare(&[("table", json!("users")), ("userId", json!(123))])
            .expect("all bound");
        assert_eq!(result.query, "SELECT * FROM $1 WHERE userId = $2");
        assert_eq!(result.params, vec![json!("users"), json!(123)]);
    }

    #[test]
    fn duplicate_placeholders_use_same_index() {
        let sql = statement("SELECT * FROM users WHERE userId = $userId OR createdBy = $userId");
        let result = sql.prepare(&[("userId", 123)]).expect("all bound");
        assert_eq!(result.query, "SELECT * FROM users WHERE userId = $1 OR createdBy = $1");
        assert_eq!(result.params, vec![123]);
    }

    #[test]
    fn multiple_unique_placeholders() {
        let sql = statement("SELECT * FROM $table WHERE status = $status LIMIT $limit");
        let result = sql
            .prepare(&[
                ("table", json!("orders")),
                ("status", json!("pending")),
                ("limit", json!(10)),
            ])
            .expect("all bound");
        assert_eq!(result.query, "SELECT * FROM $1 WHERE status = $2 LIMIT $3");
        assert_eq!(result.params, vec![json!("orders"), json!("pending"), json!(10)]);
    }

    #[test]
    fn null_values_are_present() {
        let sql = statement("UPDATE users SET name = $name");
        let result = sql.prepare(&[("name", Value::Null)]).expect("null is bound");
        assert_eq!(result.query, "UPDATE users SET name = $1");
        assert_eq!(result.params, vec![Value::Null]);

        let result = sql.prepare(&[("name", None::<&str>)]).expect("None is bound");
        assert_eq!(result.params, vec![None]);
    }

    #[test]
    fn missing_placeholder() {
        let sql = statement("SELECT * FROM $table WHERE userId = $userId");
        let err = sql.prepare(&[("table", "users")]).expect_err("userId unbound");
        assert_eq!(err, SqlError::MissingPlaceholders(vec!["userId".to_string()]));
        assert_eq!(err.to_string(), "Missing values for placeholders: userId");
    }

    #[test]
    fn multiple_missing_placeholders_in_order() {
        let sql = statement("SELECT * FROM $table WHERE userId = $userId AND status = $status");
        let err = sql.prepare(&[("table", "users")]).expect_err("two unbound");
        assert_eq!(err.to_string(), "Missing values for placeholders: userId, status");
    }

    #[test]
    fn repeated_missing_name_reported_per_occurrence() {
        let sql = statement("SELECT $a, $b, $a");
        let err = sql.prepare(&[("b", 1)]).expect_err("a unbound");
        assert_eq!(err, SqlError::MissingPlaceholders(vec!["a".to_string(), "a".to_string()]));
        assert_eq!(err.to_string(), "Missing values for placeholders: a, a");
    }

    #[test]
    fn placeholder_names_stop_at_non_ascii() {
        let sql = statement("SELECT $café");
        let result = sql.prepare(&[("caf", 1)]).expect("caf is bound");
        assert_eq!(result.query, "SELECT $1é");
        assert_eq!(result.params, vec![1]);
        assert_eq!(sql.placeholders(), vec!["caf"]);

        let err = sql.prepare(&[("café", 1)]).expect_err("only caf is a name");
        assert_eq!(err, SqlError::MissingPlaceholders(vec!["caf".to_string()]));
    }

    #[test]
    fn no_placeholders() {
        let sql = statement("SELECT * FROM users");
        let result = sql.prepare(&HashMap::<String, i32>::new()).expect("nothing to bind");
        assert_eq!(result.query, "SELECT * FROM users");
        assert!(result.params.is_empty());
    }

    #[test]
    fn various_data_types() {
        let sql = statement("INSERT INTO test VALUES ($str, $num, $bool, $date)");
        let result = sql
            .prepare(&[
                ("str", json!("hello")),
                ("num", json!(42)),
                ("bool", json!(true)),
                ("date", json!("2024-01-01T00:00:00.000Z")),
            ])
            .expect("all bound");
        assert_eq!(result.query, "INSERT INTO test VALUES ($1, $2, $3, $4)");
        assert_eq!(
            result.params,
            vec![json!("hello"), json!(42), json!(true), json!("2024-01-01T00:00:00.000Z")]
        );
    }

    #[test]
    fn preserves_parameter_order() {
        let sql = statement("SELECT $c, $a, $b");
        let result = sql.prepare(&[("a", 1), ("b", 2), ("c", 3)]).expect("all bound");
        assert_eq!(result.query, "SELECT $1, $2, $3");
        assert_eq!(result.params, vec![3, 1, 2]);
    }

    #[test]
    fn extra_bindings_are_ignored() {
        let sql = statement("SELECT $a");
        let result = sql.prepare(&[("a", 1), ("unused", 2)]).expect("all bound");
        assert_eq!(result.params, vec![1]);
    }

    #[test]
    fn placeholders_lists_distinct_names() {
        let sql = statement("SELECT $c, $a, $c, $b");
        assert_eq!(sql.placeholders(), vec!["c", "a", "b"]);
        assert!(statement("SELECT 1").placeholders().is_empty());
    }

    #[test]
    fn btree_and_slice_bindings() {
        let sql = statement("SELECT $x");
        let map = BTreeMap::from([("x".to_string(), "v")]);
        assert_eq!(sql.prepare(&map).expect("bound").params, vec!["v"]);
        let pairs: Vec<(&str, &str)> = vec![("x", "w")];
        assert_eq!(sql.prepare(pairs.as_slice()).expect("bound").params, vec!["w"]);
    }

    #[derive(Serialize)]
    struct Filter {
        table: &'static str,
        #[serde(rename = "userId")]
        user_id: u64,
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    }

    #[test]
    fn prepare_from_struct() {
        let sql = statement("SELECT * FROM $table WHERE userId = $userId AND name = $name");
        let filter = Filter { table: "users", user_id: 7, name: None, status: None };
        let result = sql.prepare_serialized(&filter).expect("all bound");
        assert_eq!(result.query, "SELECT * FROM $1 WHERE userId = $2 AND name = $3");
        assert_eq!(result.params, vec![json!("users"), json!(7), Value::Null]);
    }

    #[test]
    fn skipped_struct_field_is_missing() {
        let sql = statement("SELECT * FROM $table WHERE status = $status");
        let filter = Filter { table: "users", user_id: 7, name: None, status: None };
        let err = sql.prepare_serialized(&filter).expect_err("status skipped");
        assert_eq!(err.to_string(), "Missing values for placeholders: status");
    }

    #[test]
    fn non_map_values_rejected() {
        let err = statement("SELECT $a").prepare_serialized(&[1, 2]).expect_err("array");
        assert_eq!(err, SqlError::NotAMap("array".to_string()));
    }
}
