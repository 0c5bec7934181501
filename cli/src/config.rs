//! Configuration management for the CLI.
//!
//! Configuration is stored in `~/.lexigraph/config.yaml`. Every section is
//! optional; missing fields take their library defaults.

use std::path::{Path, PathBuf};

use lexigraph_embed::EmbedConfig;
use lexigraph_lexicon::{ClusterConfig, EdgeConfig, JumpConfig};
use serde::{Deserialize, Serialize};

use crate::paths::Paths;

/// Key prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "lexigraph";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vector database file. Empty means `~/.lexigraph/data/lexigraph.redb`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub store_path: String,

    /// Namespace for every stored key. Empty means [`DEFAULT_PREFIX`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,

    /// Embedding endpoint. Without an API key, only stored vectors are used.
    pub embed: EmbedConfig,

    pub edges: EdgeConfig,
    pub cluster: ClusterConfig,
    pub chain: JumpConfig,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

impl Config {
    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Paths::new().ok().map(|p| p.config_file())
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// The vector database path, falling back to the default data file.
    pub fn resolved_store_path(&self) -> anyhow::Result<PathBuf> {
        if !self.store_path.is_empty() {
            return Ok(PathBuf::from(&self.store_path));
        }
        let paths = Paths::new()?;
        paths.ensure_data_dir()?;
        Ok(paths.store_file())
    }

    pub fn resolved_prefix(&self) -> &str {
        if self.prefix.is_empty() {
            DEFAULT_PREFIX
        } else {
            &self.prefix
        }
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }
}

/// Loads the configuration from `custom_path` or the default location.
///
/// A missing file yields the default configuration; nothing is written
/// until [`Config::save`] is called.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    let mut cfg: Config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        Config::default()
    };

    cfg.config_path = config_path;
    Ok(cfg)
}

/// Masks the API key for display.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.yaml");
        let cfg = load_config(Some(path.to_str().unwrap())).unwrap();

        assert_eq!(cfg.resolved_prefix(), DEFAULT_PREFIX);
        assert_eq!(cfg.edges, EdgeConfig::default());
        assert_eq!(cfg.path(), path.as_path());
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "store_path: /tmp/words.redb\nedges:\n  threshold: 0.7\ncluster:\n  max_cluster_size: 12\n",
        )
        .unwrap();

        let cfg = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.resolved_store_path().unwrap(), PathBuf::from("/tmp/words.redb"));
        assert_eq!(cfg.edges.threshold, 0.7);
        assert_eq!(cfg.edges.min_connections, 1);
        assert_eq!(cfg.cluster.max_cluster_size, 12);
        assert_eq!(cfg.cluster.min_component_size, 10);
        assert_eq!(cfg.chain, JumpConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/config.yaml");

        let mut cfg = load_config(Some(path.to_str().unwrap())).unwrap();
        cfg.prefix = "decks".to_string();
        cfg.embed = EmbedConfig::default()
            .with_api_key("sk-test")
            .with_model("text-embedding-3-small");
        cfg.chain.lookback = 3;
        cfg.save().unwrap();

        let loaded = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.resolved_prefix(), "decks");
        assert_eq!(loaded.embed.api_key, "sk-test");
        assert_eq!(loaded.chain.lookback, 3);
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key("sk-1234567890abcd"), "sk-1*********abcd");
    }
}
