//! Configuration for the mdsplit CLI.
//!
//! Provides the [`MdsplitConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `MDSPLIT_CONFIG` environment variable
//! 3. XDG default: `~/.config/mdsplit/config.toml`
//! 4. Built-in defaults
//!
//! `MDSPLIT_SPLIT_*` and `MDSPLIT_CHECK_*` variables override file values.

use confyg::{env, Confygery};
use mdsplit_check::DEFAULT_REPORT_PATH;
use mdsplit_content::plan::DEFAULT_FRAMEWORK;
use mdsplit_core::traits::ConfigProvider;
use mdsplit_core::util::paths::expand_tilde;
use mdsplit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "MDSPLIT";
const CONFIG_ENV: &str = "MDSPLIT_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the mdsplit CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MdsplitConfig {
    /// Framework name written into default module headers.
    pub framework_name: String,

    /// Split settings.
    pub split: SplitConfig,

    /// Check settings.
    pub check: CheckConfig,
}

/// Settings for `mdsplit split`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Source markdown document.
    pub source: String,

    /// Destination directory.
    pub output_dir: String,

    /// Optional TOML split plan; the built-in plan is used when unset.
    pub plan: Option<String>,
}

/// Settings for `mdsplit check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Optional TOML marker set; the built-in set is used when unset.
    pub markers: Option<String>,

    /// Report location, relative to the destination directory.
    pub report_path: String,

    /// Report heading.
    pub report_title: String,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for MdsplitConfig {
    fn default() -> Self {
        Self {
            framework_name: DEFAULT_FRAMEWORK.to_string(),
            split: SplitConfig::default(),
            check: CheckConfig::default(),
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            source: "JobEvalV5.md".to_string(),
            output_dir: "refactored".to_string(),
            plan: None,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            markers: None,
            report_path: DEFAULT_REPORT_PATH.to_string(),
            report_title: "PD-SMIS v5.1 Validation Test Report".to_string(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl MdsplitConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                log::debug!("loading config from {}", path.display());
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        env_opts.add_section("split");
        env_opts.add_section("check");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mdsplit").join("config.toml"))
    }

    /// Optional split plan path, tilde-expanded.
    pub fn plan_path(&self) -> Option<PathBuf> {
        self.split.plan.as_deref().map(expand_tilde)
    }

    /// Optional marker set path, tilde-expanded.
    pub fn markers_path(&self) -> Option<PathBuf> {
        self.check.markers.as_deref().map(expand_tilde)
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `MDSPLIT_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for MdsplitConfig {
    fn source_path(&self) -> Result<PathBuf> {
        Ok(expand_tilde(&self.split.source))
    }

    fn output_root(&self) -> Result<PathBuf> {
        Ok(expand_tilde(&self.split.output_dir))
    }
}

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                flatten_toml_value(val, &format!("{prefix}_{}", key.to_uppercase()), out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// RAII guard for env var manipulation in tests.
    struct EnvGuard {
        key: String,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn new(key: &str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: tests touching the environment use distinct keys.
            unsafe { std::env::set_var(key, value) };
            Self {
                key: key.to_string(),
                prev,
            }
        }

        fn remove(key: &str) -> Self {
            let prev = std::env::var(key).ok();
            // SAFETY: tests touching the environment use distinct keys.
            unsafe { std::env::remove_var(key) };
            Self {
                key: key.to_string(),
                prev,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: restores the value captured in `new`/`remove`.
            unsafe {
                match &self.prev {
                    Some(val) => std::env::set_var(&self.key, val),
                    None => std::env::remove_var(&self.key),
                }
            }
        }
    }

    #[test]
    fn test_mdsplit_config_default() {
        let config = MdsplitConfig::default();
        assert_eq!(config.framework_name, "PD-SMIS v5.1 Modular Framework");
        assert_eq!(config.split.source, "JobEvalV5.md");
        assert_eq!(config.split.output_dir, "refactored");
        assert!(config.split.plan.is_none());
        assert_eq!(config.check.report_path, "tests/validation_test_report.md");
        assert_eq!(config.check.report_title, "PD-SMIS v5.1 Validation Test Report");
    }

    #[test]
    fn test_mdsplit_config_from_toml() {
        let config: MdsplitConfig = toml::from_str(
            r#"
                framework_name = "Handbook"

                [split]
                source = "docs/big.md"
                plan = "~/plans/handbook.toml"

                [check]
                report_title = "Handbook Report"
            "#,
        )
        .unwrap();

        assert_eq!(config.framework_name, "Handbook");
        assert_eq!(config.split.source, "docs/big.md");
        assert_eq!(config.split.output_dir, "refactored");
        assert_eq!(config.check.report_title, "Handbook Report");
        assert!(config.markers_path().is_none());
        assert!(!config.plan_path().unwrap().starts_with("~"));
    }

    #[test]
    fn test_mdsplit_config_toml_round_trip() {
        let config = MdsplitConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[split]"));
        assert!(toml_str.contains("output_dir = \"refactored\""));

        let parsed: MdsplitConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.split.source, config.split.source);
    }

    #[test]
    fn test_mdsplit_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "framework_name = \"Loaded\"\n[split]\noutput_dir = \"out\"\n").unwrap();

        let config = MdsplitConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.framework_name, "Loaded");
        assert_eq!(config.output_root().unwrap(), PathBuf::from("out"));
    }

    #[test]
    fn test_mdsplit_config_load_missing_file_uses_defaults() {
        let config = MdsplitConfig::load(Some("/nonexistent/mdsplit.toml")).unwrap();
        assert_eq!(config.split.output_dir, "refactored");
    }

    #[test]
    fn test_mdsplit_config_load_env_overlay() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[split]\nsource = \"from-file.md\"\n").unwrap();

        // confyg passes env values as strings, so overlay a string field.
        let _guard = EnvGuard::new("MDSPLIT_SPLIT_SOURCE", "from-env.md");
        let config = MdsplitConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.split.source, "from-env.md");
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = MdsplitConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    #[test]
    fn test_resolve_config_path_default() {
        let _guard = EnvGuard::remove("MDSPLIT_CONFIG");
        if let Some(path) = MdsplitConfig::resolve_config_path(None) {
            assert!(path.ends_with("mdsplit/config.toml"));
        }
    }

    #[test]
    fn test_config_provider_paths() {
        let config = MdsplitConfig {
            split: SplitConfig {
                source: "/data/JobEvalV5.md".into(),
                output_dir: "/data/out".into(),
                plan: None,
            },
            ..Default::default()
        };
        assert_eq!(config.source_path().unwrap(), PathBuf::from("/data/JobEvalV5.md"));
        assert_eq!(config.output_root().unwrap(), PathBuf::from("/data/out"));
    }

    #[test]
    fn test_to_env_vars() {
        let vars = MdsplitConfig::default().to_env_vars().unwrap();
        let map: HashMap<_, _> = vars.into_iter().collect();
        assert_eq!(map.get("MDSPLIT_SPLIT_SOURCE").unwrap(), "JobEvalV5.md");
        assert_eq!(
            map.get("MDSPLIT_CHECK_REPORT_PATH").unwrap(),
            "tests/validation_test_report.md"
        );
        assert!(!map.contains_key("MDSPLIT_SPLIT_PLAN"));
    }
}
