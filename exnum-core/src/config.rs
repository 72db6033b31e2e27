//! Configuration for exnum, loadable from TOML.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [registry]
//! trace_construction = true
//!
//! [[scopes]]
//! name = "billing"
//! range = 1000
//! ```
//!
//! Every section is optional and falls back to its defaults.

use serde::{Deserialize, Serialize};

use crate::accessor::{Accessor, AccessorOptions};
use crate::error::{ExnumError, Result};
use crate::registry::Registry;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExnumConfig {
    /// Logging settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Registry behavior.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Named scopes with their code ranges.
    #[serde(default)]
    pub scopes: Vec<ScopeConfig>,
}

impl ExnumConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ExnumError::Config` if the TOML is invalid or declares the
    /// same scope twice.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ExnumError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        for (i, scope) in self.scopes.iter().enumerate() {
            if scope.name.is_empty() {
                return Err(ExnumError::Config(format!("scope #{i} has an empty name")));
            }
            if self.scopes[..i].iter().any(|s| s.name == scope.name) {
                return Err(ExnumError::Config(format!("scope {} declared twice", scope.name)));
            }
        }
        Ok(())
    }

    /// Accessor options for a configured scope.
    #[must_use]
    pub fn scope(&self, name: &str) -> Option<AccessorOptions> {
        self.scopes
            .iter()
            .find(|s| s.name == name)
            .map(ScopeConfig::options)
    }

    /// Accessor over `registry` for a configured scope.
    ///
    /// # Errors
    /// Returns `ExnumError::UnknownScope` if `name` is not configured.
    pub fn accessor<'r>(&self, registry: &'r Registry, name: &str) -> Result<Accessor<'r>> {
        self.scope(name)
            .map(|options| registry.accessor(options))
            .ok_or_else(|| ExnumError::UnknownScope(name.to_string()))
    }

    /// A fresh registry with these settings.
    #[must_use]
    pub fn build_registry(&self) -> Registry {
        Registry::with_config(self.registry.clone())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log filter: trace, debug, info, warn, error, or an `EnvFilter`
    /// directive string. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

/// Registry behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Emit a `trace` event for every exception construction.
    #[serde(default)]
    pub trace_construction: bool,
}

/// A named scope and its code range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Scope name.
    pub name: String,
    /// Base offset added to variant indices.
    #[serde(default)]
    pub range: i64,
}

impl ScopeConfig {
    /// Accessor options for this scope.
    #[must_use]
    pub fn options(&self) -> AccessorOptions {
        AccessorOptions::scoped(self.name.clone()).with_range(self.range)
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;

    #[test]
    fn empty_toml_is_default() {
        let config = ExnumConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.general.log_level, "info");
        assert!(!config.general.json_logs);
        assert!(!config.registry.trace_construction);
        assert!(config.scopes.is_empty());
    }

    #[test]
    fn full_toml() {
        let config = ExnumConfig::from_toml(
            r#"
            [general]
            log_level = "debug"
            json_logs = true

            [registry]
            trace_construction = true

            [[scopes]]
            name = "billing"
            range = 1000

            [[scopes]]
            name = "auth"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.general.log_level, "debug");
        assert!(config.general.json_logs);
        assert!(config.registry.trace_construction);
        assert_eq!(
            config.scope("billing"),
            Some(AccessorOptions::scoped("billing").with_range(1000))
        );
        assert_eq!(config.scope("auth").map(|o| o.range), Some(0));
        assert!(config.scope("missing").is_none());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ExnumConfig::from_toml("[[scopes]]\nrange = \"x\"").expect_err("must fail");
        assert!(matches!(err, ExnumError::Config(_)));
    }

    #[test]
    fn duplicate_scope_rejected() {
        let err = ExnumConfig::from_toml("[[scopes]]\nname = \"a\"\n[[scopes]]\nname = \"a\"")
            .expect_err("duplicate");
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn accessor_for_configured_scope() {
        let config = ExnumConfig::from_toml("[[scopes]]\nname = \"billing\"\nrange = 2000")
            .expect("valid config");
        let registry = config.build_registry();
        let billing = config.accessor(&registry, "billing").expect("configured");
        assert_eq!(billing.variant(3).code(), Code::new(2003));
        assert!(matches!(
            config.accessor(&registry, "nope"),
            Err(ExnumError::UnknownScope(ref s)) if s == "nope"
        ));
    }

    #[test]
    fn from_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("exnum.toml");
        std::fs::write(&path, "[general]\nlog_level = \"warn\"\n").expect("write config");
        let config = ExnumConfig::from_file(&path).expect("load config");
        assert_eq!(config.general.log_level, "warn");

        let missing = ExnumConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ExnumError::Io(_))));
    }
}
