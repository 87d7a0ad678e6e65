//! Configuration resolution for Marquee.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/marquee/settings.json)
//! 3. Project config (.marquee/settings.json)
//! 4. Environment variables (`MARQUEE_*`)
//! 5. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::edition::Edition;
use crate::error::{Error, Result};

/// Complete Marquee configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub local_player: LocalPlayerConfig,
}

/// Registry service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub database_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: "info".to_string(),
        }
    }
}

/// Rules applied when a previously unseen player is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    pub edition: Edition,
    /// Licence assigned to players that are provisioned on first contact.
    pub default_licence_id: i64,
    /// Content refresh interval handed to new players (seconds).
    pub refresh_secs: i64,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            edition: Edition::Core,
            default_licence_id: 1,
            refresh_secs: 900,
        }
    }
}

/// Bootstrap values for the local (loopback) player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalPlayerConfig {
    pub api_endpoint: String,
    pub licence_id: i64,
    pub is_intranet: bool,
}

impl Default for LocalPlayerConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "http://localhost:8080/v2".to_string(),
            licence_id: 1,
            is_intranet: true,
        }
    }
}

/// Load configuration with hierarchical resolution.
pub fn load_config(project_dir: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            config = load_config_file(&global_path)?;
        }
    }

    if let Some(dir) = project_dir {
        let project_path = dir.join(".marquee").join("settings.json");
        if project_path.exists() {
            let project = load_config_file(&project_path)?;
            merge_config(&mut config, project);
        }
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

/// Get the default database path for the registry.
pub fn database_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("registry.db"))
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".marquee"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/marquee"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("marquee"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: Config) {
    if overlay.registry.database_path.is_some() {
        base.registry.database_path = overlay.registry.database_path;
    }
    base.registry.log_level = overlay.registry.log_level;

    base.provisioning = overlay.provisioning;
    base.local_player = overlay.local_player;
}

/// Apply `MARQUEE_*` overrides. `lookup` abstracts the environment so the
/// precedence rules can be exercised without touching process state.
fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("MARQUEE_EDITION") {
        config.provisioning.edition = val.parse()?;
    }
    if let Some(val) = lookup("MARQUEE_DATABASE_PATH") {
        config.registry.database_path = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("MARQUEE_LOG_LEVEL") {
        config.registry.log_level = val;
    }
    if let Some(val) = lookup("MARQUEE_DEFAULT_LICENCE_ID") {
        if let Ok(n) = val.parse() {
            config.provisioning.default_licence_id = n;
        }
    }
    if let Some(val) = lookup("MARQUEE_LOCAL_API_ENDPOINT") {
        config.local_player.api_endpoint = val;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_stock_player_values() {
        let config = Config::default();
        assert_eq!(config.provisioning.edition, Edition::Core);
        assert_eq!(config.provisioning.refresh_secs, 900);
        assert_eq!(config.local_player.api_endpoint, "http://localhost:8080/v2");
        assert!(config.local_player.is_intranet);
    }

    #[test]
    fn env_overrides_edition_and_endpoint() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("MARQUEE_EDITION", "edge"),
                ("MARQUEE_LOCAL_API_ENDPOINT", "http://10.0.0.2/v2"),
                ("MARQUEE_DEFAULT_LICENCE_ID", "not-a-number"),
            ]),
        )
        .unwrap();

        assert_eq!(config.provisioning.edition, Edition::Edge);
        assert_eq!(config.local_player.api_endpoint, "http://10.0.0.2/v2");
        assert_eq!(config.provisioning.default_licence_id, 1);
    }

    #[test]
    fn unknown_edition_in_env_is_an_error() {
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, env(&[("MARQUEE_EDITION", "cloud")]));
        assert!(matches!(result, Err(Error::UnknownEdition(_))));
    }

    #[test]
    fn partial_project_file_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"provisioning": {"edition": "edge"}}"#).unwrap();

        let loaded = load_config_file(&path).unwrap();
        let mut config = Config::default();
        merge_config(&mut config, loaded);

        assert_eq!(config.provisioning.edition, Edition::Edge);
        assert_eq!(config.provisioning.default_licence_id, 1);
        assert_eq!(config.registry.log_level, "info");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }
}
