use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::transpiler::DEFAULT_MAX_DEPTH;
use crate::sql::Dialect;
use crate::utils::file::expand_home;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};

// =============================================================================
// File Config (JSON deserialization)
// =============================================================================

/// Root configuration file structure
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    pub dialect: Option<Dialect>,
    pub schema: Option<String>,
    pub max_depth: Option<usize>,
    pub condition_only: Option<bool>,
    /// Catch unknown fields for warning
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load config from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: FileConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Log warning for unknown fields (possible typos)
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if other.dialect.is_some() {
            self.dialect = other.dialect;
        }
        if other.schema.is_some() {
            self.schema = other.schema;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if other.condition_only.is_some() {
            self.condition_only = other.condition_only;
        }
    }
}

// =============================================================================
// Application Config
// =============================================================================

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Target dialect; `Unspecified` until a file, flag or env var names one
    pub dialect: Dialect,
    pub schema: Option<PathBuf>,
    pub max_depth: usize,
    /// Print conditions without the `WHERE ` prefix
    pub condition_only: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Unspecified,
            schema: None,
            max_depth: DEFAULT_MAX_DEPTH,
            condition_only: false,
        }
    }
}

impl AppConfig {
    /// Load configuration: profile file, then local or `--config` file, then CLI/env
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.jsonlogic-sql/jlsql.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::layer(cli, file_config);
        config.validate()?;

        tracing::debug!(
            dialect = %config.dialect,
            schema = ?config.schema,
            max_depth = config.max_depth,
            condition_only = config.condition_only,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(cli: &CliConfig, file: FileConfig) -> Self {
        let defaults = Self::default();

        let dialect = cli.dialect.or(file.dialect).unwrap_or(defaults.dialect);

        // schema: CLI paths are used as given, file paths get ~ expansion
        let schema = cli
            .schema
            .clone()
            .or_else(|| file.schema.as_deref().map(expand_home));

        let max_depth = cli
            .max_depth
            .or(file.max_depth)
            .unwrap_or(defaults.max_depth);

        let condition_only = file.condition_only.unwrap_or(defaults.condition_only);

        Self {
            dialect,
            schema,
            max_depth,
            condition_only,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            anyhow::bail!("max_depth must be greater than zero");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.jsonlogic-sql/jlsql.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
