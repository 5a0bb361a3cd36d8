//! Config command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use linkset_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "mirror_dir": config.mirror_dir,
                    "bookmarks_file": config.bookmarks_file,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:       {}", config.data_dir.display());
            println!("  mirror_dir:     {}", display_optional(&config.mirror_dir));
            println!("  bookmarks_file: {}", display_optional(&config.bookmarks_file));
            println!("  log_file:       {}", display_optional(&config.log_file));
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir must not be empty");
            }
            config.data_dir = value.into();
        }
        "mirror_dir" => config.mirror_dir = optional_path(value),
        "bookmarks_file" => config.bookmarks_file = optional_path(value),
        "log_file" => config.log_file = optional_path(value),
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, mirror_dir, bookmarks_file, log_file",
                key
            );
        }
    }
    Ok(())
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.into())
    }
}

fn display_optional(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keys() {
        let mut config = Config::default();

        apply(&mut config, "mirror_dir", "/mnt/drive").unwrap();
        assert_eq!(config.mirror_dir, Some(PathBuf::from("/mnt/drive")));

        apply(&mut config, "mirror_dir", "none").unwrap();
        assert!(config.mirror_dir.is_none());

        apply(&mut config, "data_dir", "/data").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert!(apply(&mut config, "data_dir", "").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        let err = apply(&mut config, "sync_url", "x").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }
}
