//! Client config loading for the CLI.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kindle_notebook::ClientConfig;

/// Config file name inside the per-user config directory.
const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "kindle-notebook";

/// Resolved config plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// File the config was read from, if any.
    pub path: Option<PathBuf>,
    /// Validated client config (defaults when no file was read).
    pub config: ClientConfig,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/kindle-notebook/config.json`
/// 2. `$HOME/.config/kindle-notebook/config.json`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    default_config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn default_config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg) = xdg_config_home {
        return Some(PathBuf::from(xdg).join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the client config.
///
/// An explicit path must exist. The default path is optional; when it is
/// absent the built-in defaults are used.
pub fn load_client_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config,
        });
    }

    match resolve_default_config_path() {
        Some(path) if path.exists() => {
            let config = load_file_config(&path)?;
            Ok(LoadedConfig {
                path: Some(path),
                config,
            })
        }
        _ => Ok(LoadedConfig {
            path: None,
            config: ClientConfig::default(),
        }),
    }
}

fn load_file_config(path: &Path) -> Result<ClientConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn test_default_path_prefers_xdg() {
        let path = default_config_path_from(
            Some(OsString::from("/xdg")),
            Some(OsString::from("/home/reader")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/xdg/kindle-notebook/config.json"));
    }

    #[test]
    fn test_default_path_falls_back_to_home() {
        let path = default_config_path_from(None, Some(OsString::from("/home/reader"))).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/reader/.config/kindle-notebook/config.json")
        );
        assert!(default_config_path_from(None, None).is_none());
    }

    #[test]
    fn test_explicit_config_file_is_loaded_and_validated() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"html_max_attempts": 4, "read_base_url": "http://127.0.0.1:8080"}}"#)
            .unwrap();

        let loaded = load_client_config(Some(file.path())).unwrap();
        assert_eq!(loaded.path.as_deref(), Some(file.path()));
        assert_eq!(loaded.config.html_max_attempts, 4);
        assert_eq!(loaded.config.read_base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_value_reports_field_and_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"read_timeout_secs": 0}}"#).unwrap();

        let err = load_client_config(Some(file.path())).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Failed to parse config file"), "{msg}");
        assert!(msg.contains("read_timeout_secs"), "{msg}");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = load_client_config(Some(Path::new("/nonexistent/kindle/config.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
