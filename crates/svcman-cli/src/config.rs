//! Configuration for the svcman application.
//!
//! Provides [`SvcmanConfig`], loaded from TOML files, environment variables,
//! and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `SVCMAN_CONFIG` environment variable
//! 3. XDG default: `~/.config/svcman/config.toml`
//! 4. Built-in defaults

use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use svcman_core::traits::ConfigProvider;
use svcman_core::{Error, Result};

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the svcman application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvcmanConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// Base path of the project tree. Defaults to the working directory.
    pub base_path: Option<String>,

    /// Discovery configuration.
    pub discovery: DiscoveryConfig,

    /// Builtin command group configuration.
    pub builtins: BuiltinsConfig,
}

/// Where the registry scans for service command manifests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Roots scanned for `*/scripts/commands.toml`, relative to the base
    /// path unless absolute.
    pub roots: Vec<String>,
}

/// Builtin command group configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltinsConfig {
    /// Register the builtin groups (git, admin, user, config) before the
    /// scan. Discovered groups with the same name shadow builtins.
    pub enabled: bool,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for SvcmanConfig {
    fn default() -> Self {
        Self {
            project_name: "svcman".to_string(),
            base_path: None,
            discovery: DiscoveryConfig::default(),
            builtins: BuiltinsConfig::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            roots: vec!["services".to_string()],
        }
    }
}

impl Default for BuiltinsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl SvcmanConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Loading priority:
    /// 1. Explicit `config_path` (from `--config` flag)
    /// 2. `SVCMAN_CONFIG` env var
    /// 3. XDG default: `~/.config/svcman/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("SVCMAN");
        env_opts.add_section("discovery");
        env_opts.add_section("builtins");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        // 1. Explicit --config flag
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        // 2. SVCMAN_CONFIG env var
        if let Ok(path) = std::env::var("SVCMAN_CONFIG") {
            return Some(PathBuf::from(path));
        }

        // 3. XDG default
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("svcman").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for SvcmanConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn base_path(&self) -> Result<PathBuf> {
        match &self.base_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => std::env::current_dir()
                .map_err(|e| Error::config(format!("Could not determine base path: {e}"))),
        }
    }

    fn discovery_roots(&self) -> Result<Vec<PathBuf>> {
        let base = self.base_path()?;
        Ok(self
            .discovery
            .roots
            .iter()
            .map(|root| {
                let path = PathBuf::from(root);
                if path.is_absolute() { path } else { base.join(path) }
            })
            .collect())
    }

    fn builtins_enabled(&self) -> bool {
        self.builtins.enabled
    }
}

// ============================================================================
// Tests
// ============================================================================
