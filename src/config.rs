//! Configuration file support for depaudit.
//!
//! Provides YAML-based configuration through `depaudit.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use depaudit::dependency_audit::domain::Severity;
use depaudit::shared::Result;

pub const CONFIG_FILENAME: &str = "depaudit.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub osv_api_url: Option<String>,
    pub github_api_url: Option<String>,
    pub directories: Option<Vec<String>>,
    pub concurrency: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub fail_on: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    // an empty document deserializes as unit, not as an empty mapping
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.concurrency == Some(0) {
        bail!(
            "Invalid config: concurrency must be at least 1.\n\n\
             💡 Hint: Remove the field to use the default of 8 in-flight lookups."
        );
    }
    if config.max_attempts == Some(0) {
        bail!(
            "Invalid config: max_attempts must be at least 1.\n\n\
             💡 Hint: Remove the field to use the default of 3 attempts."
        );
    }
    if config.request_timeout_secs == Some(0) {
        bail!("Invalid config: request_timeout_secs must be at least 1.");
    }
    if let Some(ref label) = config.fail_on {
        if Severity::from_label(label).is_none() {
            bail!(
                "Invalid config: fail_on '{}' is not a severity.\n\n\
                 💡 Hint: Use one of CRITICAL, HIGH, MEDIUM, LOW or UNKNOWN.",
                label
            );
        }
    }
    if let Some(ref directories) = config.directories {
        if let Some(bad) = directories
            .iter()
            .find(|d| d.split('/').any(|segment| segment == ".."))
        {
            bail!(
                "Invalid config: directory '{}' must stay inside the repository.",
                bad
            );
        }
    }
    Ok(())
}

fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!("Unknown config field '{}' will be ignored.", key);
    }
}
