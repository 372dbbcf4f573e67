use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chat::CacheSettings;
use crate::chat::cache::DEFAULT_CACHE_KEY;
use crate::network::NetworkSettings;

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";
pub const SESSION_COOKIE_ENV: &str = "SHOPORA_SESSION_COOKIE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Operator identity the chat panel speaks as.
    pub identity: String,
    pub cache_key: String,
    pub retention_minutes: u32,
    pub database_path: String,
    pub listen_addr: String,
    pub bootstrap_nodes: Vec<String>,
    pub api_base_url: String,
    /// Refuse to open the panel without a signed-in backend session.
    pub require_session: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identity: "admin@shopora.com".to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            retention_minutes: 60,
            database_path: "data/chat.db".to_string(),
            listen_addr: "/ip4/0.0.0.0/tcp/0".to_string(),
            bootstrap_nodes: Vec::new(),
            api_base_url: "http://localhost:8080".to_string(),
            require_session: false,
        }
    }
}

impl AppConfig {
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            viewer: self.identity.clone(),
            cache_key: self.cache_key.clone(),
            retention_ms: i64::from(self.retention_minutes) * 60 * 1000,
        }
    }

    pub fn network_settings(&self) -> NetworkSettings {
        NetworkSettings {
            listen_addr: self.listen_addr.clone(),
            bootstrap_nodes: self.bootstrap_nodes.clone(),
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        fs::write(&path, r#"{ "identity": "ops@shopora.com", "retention_minutes": 5 }"#).unwrap();

        let config = load_config(path.to_str().unwrap());

        assert_eq!(config.identity, "ops@shopora.com");
        assert_eq!(config.cache_key, "admin_chat");
        assert_eq!(config.cache_settings().retention_ms, 300_000);
        assert!(!config.require_session);
    }

    #[test]
    fn missing_or_broken_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert_eq!(load_config(missing.to_str().unwrap()), AppConfig::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "identity = admin").unwrap();
        assert_eq!(load_config(broken.to_str().unwrap()), AppConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chat.json");
        let path = path.to_str().unwrap();

        let config = AppConfig {
            bootstrap_nodes: vec!["/ip4/10.0.0.1/tcp/4001".to_string()],
            require_session: true,
            ..AppConfig::default()
        };
        save_config(path, &config).unwrap();

        assert_eq!(load_config(path), config);
    }

    #[test]
    fn default_retention_is_one_hour() {
        let settings = AppConfig::default().cache_settings();
        assert_eq!(settings.retention_ms, 3_600_000);
        assert_eq!(settings.viewer, "admin@shopora.com");
    }
}
