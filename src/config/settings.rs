use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.pvault.toml`.
///
/// Every field has a default so pvault works without any config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the project root) holding the `.pv` files.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Vault opened by `shell` without showing the selection menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vault: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            default_vault: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".pvault.toml";

    /// Load settings from `<project_dir>/.pvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the vault directory against `project_dir`.
    ///
    /// `override_dir` (the `--dir` flag) wins over the configured value.
    pub fn vault_root(&self, project_dir: &Path, override_dir: Option<&str>) -> PathBuf {
        project_dir.join(override_dir.unwrap_or(&self.vault_dir))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
