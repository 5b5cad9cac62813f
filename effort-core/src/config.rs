//! Configuration file support
//!
//! Loads estimation defaults from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.effortrc.json` in the working directory
//! 3. `effort.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::effort::PowerMode;
use crate::parametric::ParametricModel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const RC_FILE: &str = ".effortrc.json";
const CONFIG_FILE: &str = "effort.config.json";

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Estimation configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffortConfig {
    /// Parametric model id (default: early_design)
    #[serde(default)]
    pub model: Option<String>,

    /// Hourly rate for cost estimates (default: no cost estimate)
    #[serde(default)]
    pub hourly_rate: Option<f64>,

    /// Exponentiation mode (default: real)
    #[serde(default)]
    pub power_mode: Option<PowerMode>,

    /// Report format (default: text)
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Configuration with every default filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub model_id: String,
    pub hourly_rate: Option<f64>,
    pub power_mode: PowerMode,
    pub format: OutputFormat,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl EffortConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref model) = self.model {
            if model.trim().is_empty() {
                anyhow::bail!("model must not be empty");
            }
        }

        if let Some(rate) = self.hourly_rate {
            if rate.is_nan() || rate < 0.0 {
                anyhow::bail!("hourly_rate must be non-negative (got {})", rate);
            }
        }

        Ok(())
    }

    /// Fill in defaults
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;
        Ok(ResolvedConfig {
            model_id: self
                .model
                .clone()
                .unwrap_or_else(|| ParametricModel::EARLY_DESIGN_ID.to_string()),
            hourly_rate: self.hourly_rate,
            power_mode: self.power_mode.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        EffortConfig::default().resolve()
    }
}

/// Discover and load a config file from the given directory
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(EffortConfig, PathBuf)>> {
    for name in [RC_FILE, CONFIG_FILE] {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<EffortConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: EffortConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (EffortConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    tracing::debug!(
        model = %resolved.model_id,
        power_mode = resolved.power_mode.as_str(),
        path = ?resolved.config_path,
        "resolved configuration"
    );
    Ok(resolved)
}
