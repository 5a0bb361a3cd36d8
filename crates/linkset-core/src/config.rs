//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/linkset/config.toml)
//! 3. Environment variables (LINKSET_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "LINKSET";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the item, folder and inbox snapshots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory used as the remote mirror (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_dir: Option<PathBuf>,

    /// Browser `Bookmarks` file to import from (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks_file: Option<PathBuf>,

    /// Write logs here instead of stderr (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            mirror_dir: None,
            bookmarks_file: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (LINKSET_DATA_DIR, LINKSET_MIRROR_DIR, ...)
    /// 2. Config file (~/.config/linkset/config.toml or LINKSET_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit `--config` path
    pub fn load_with_cli_override(cli_path: Option<&Path>) -> Result<Self> {
        match cli_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            Self::load_from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        };

        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Parse TOML and apply environment overrides
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            if !val.is_empty() {
                self.data_dir = PathBuf::from(val);
            }
        }

        // Empty string clears an optional path
        let optional = |name: &str, slot: &mut Option<PathBuf>| {
            if let Ok(val) = std::env::var(format!("{}_{}", ENV_PREFIX, name)) {
                *slot = if val.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(val))
                };
            }
        };
        optional("MIRROR_DIR", &mut self.mirror_dir);
        optional("BOOKMARKS_FILE", &mut self.bookmarks_file);
        optional("LOG_FILE", &mut self.log_file);
    }

    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with LINKSET_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linkset")
            .join("config.toml")
    }

    /// Item snapshot
    pub fn items_path(&self) -> PathBuf {
        self.data_dir.join("links.json")
    }

    /// Folder registry
    pub fn folders_path(&self) -> PathBuf {
        self.data_dir.join("folders.json")
    }

    /// Capture inbox (`linkset:inbox`)
    pub fn inbox_path(&self) -> PathBuf {
        self.data_dir.join("inbox.json")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linkset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "LINKSET_DATA_DIR",
        "LINKSET_MIRROR_DIR",
        "LINKSET_BOOKMARKS_FILE",
        "LINKSET_LOG_FILE",
        "LINKSET_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.mirror_dir.is_none());
        assert!(config.bookmarks_file.is_none());
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("linkset"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/linkset"),
            ..Config::default()
        };

        assert_eq!(config.items_path(), PathBuf::from("/data/linkset/links.json"));
        assert!(config.folders_path().ends_with("folders.json"));
        assert!(config.inbox_path().ends_with("inbox.json"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKSET_DATA_DIR", "/tmp/linkset-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/linkset-test"));
    }

    #[test]
    fn test_env_override_optional_paths() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LINKSET_MIRROR_DIR", "/mnt/drive/linkset");
        env::set_var("LINKSET_LOG_FILE", "/tmp/linkset.log");
        config.apply_env_overrides();
        assert_eq!(config.mirror_dir, Some(PathBuf::from("/mnt/drive/linkset")));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/linkset.log")));
        assert!(config.bookmarks_file.is_none());

        // Empty string clears it
        env::set_var("LINKSET_MIRROR_DIR", "");
        config.apply_env_overrides();
        assert!(config.mirror_dir.is_none());
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/linkset"),
            mirror_dir: Some(PathBuf::from("/mnt/mirror")),
            bookmarks_file: None,
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("mirror_dir"));
        assert!(!toml_str.contains("bookmarks_file"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            bookmarks_file = "/home/me/.config/chromium/Default/Bookmarks"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(
            config.bookmarks_file,
            Some(PathBuf::from("/home/me/.config/chromium/Default/Bookmarks"))
        );
        assert!(config.mirror_dir.is_none());
    }

    #[test]
    fn test_env_beats_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("LINKSET_DATA_DIR", "/from/env");
        let config = Config::load_from_str(r#"data_dir = "/from/file""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        env::set_var("LINKSET_DATA_DIR", &data_dir);

        let config = Config::load_from_path(&temp_dir.path().join("missing.toml")).unwrap();
        // Defaults, and the data directory is created
        assert!(config.mirror_dir.is_none());
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_save_and_load_with_cli_override() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            mirror_dir: Some(temp_dir.path().join("mirror")),
            ..Config::default()
        };
        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_with_cli_override(Some(config_path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }
}
