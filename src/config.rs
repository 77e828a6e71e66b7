use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_tags")]
    pub tags: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_tags() -> String {
    "story".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tags: default_tags(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

pub fn load_config(config_path: &Path) -> SearchConfig {
    if !config_path.exists() {
        info!("No config found at {:?}, using defaults", config_path);
        return SearchConfig::default();
    }
    let content = std::fs::read_to_string(config_path).unwrap_or_default();
    match serde_json::from_str::<SearchConfig>(&content) {
        Ok(config) => {
            info!("Config loaded from {:?}", config_path);
            config
        }
        Err(e) => {
            warn!("Config parse failed ({}), using defaults", e);
            SearchConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.tags, "story");
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_empty_object_takes_all_defaults() {
        let config: SearchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config: SearchConfig = serde_json::from_str(r#"{ "debounce_ms": 250 }"#).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.tags, "story");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SearchConfig {
            base_url: "http://localhost:8080".into(),
            debounce_ms: 100,
            ..SearchConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let restored: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.json"));
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let config = load_config(&path);
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_valid_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tags": "story", "debounce_ms": 750 }"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.debounce_ms, 750);
    }
}
