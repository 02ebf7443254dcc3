//! Configuration for the precalculation pass.
//!
//! Load order: `.skilltree/config.toml` → environment variables → defaults.

use crate::schema::DEFAULT_INDENT;
use crate::storage::TREE_FILE;
use crate::travel::{DEFAULT_TRAVEL_STATS, TravelStats};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".skilltree";
const CONFIG_FILE: &str = "config.toml";
const MAX_INDENT: usize = 16;

/// Top-level precalculation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecalcConfig {
    pub classifier: ClassifierConfig,
    pub storage: StorageConfig,
}

/// Travel-stat allow-list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Replaces the built-in list when set.
    pub travel_stats: Option<Vec<String>>,
    /// Appended to whichever list is active.
    pub extra_travel_stats: Vec<String>,
}

/// Where and how the tree document is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Document file name inside the tree directory.
    pub file_name: String,
    /// Pretty-print indent width.
    pub indent: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_name: TREE_FILE.to_string(),
            indent: DEFAULT_INDENT,
        }
    }
}

impl ClassifierConfig {
    /// Build the classifier from the configured lists.
    pub fn travel_stats(&self) -> TravelStats {
        let base: Vec<String> = match &self.travel_stats {
            Some(list) => list.clone(),
            None => DEFAULT_TRAVEL_STATS.iter().map(|s| s.to_string()).collect(),
        };
        TravelStats::new(base.into_iter().chain(self.extra_travel_stats.iter().cloned()))
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

/// Default config path for a tree directory.
pub fn config_path(tree_dir: &Path) -> PathBuf {
    tree_dir.join(CONFIG_DIR).join(CONFIG_FILE)
}

impl PrecalcConfig {
    /// Load config from `.skilltree/config.toml` in the tree directory, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(tree_dir: &Path) -> Result<Self> {
        Self::load_from(&config_path(tree_dir))
    }

    /// Load config from an explicit file path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        } else {
            Self::default()
        };

        env_override("SKILLTREE_FILE_NAME", &mut config.storage.file_name);
        env_override("SKILLTREE_INDENT", &mut config.storage.indent);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.file_name.trim().is_empty() {
            anyhow::bail!("storage.file_name must not be empty");
        }
        if self.storage.indent > MAX_INDENT {
            anyhow::bail!(
                "storage.indent ({}) must be at most {}",
                self.storage.indent,
                MAX_INDENT
            );
        }
        Ok(())
    }
}
