use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// IEEE MA-L registry in its text layout
pub const DEFAULT_REGISTRY_URL: &str = "https://standards-oui.ieee.org/oui/oui.txt";

/// Configuration structure loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Vendor cache file path
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Online registry source configuration
    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("/var/cache/oui-lookup/vendors.json")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry location: http(s) URL or file:// path
    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Request timeout in seconds, transport default when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with registry downloads
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_user_agent() -> String {
    format!("oui-lookup/{}", env!("CARGO_PKG_VERSION"))
}

impl RegistryConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            registry: RegistryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("cache_path: /tmp/vendors.json\n").unwrap();
        assert_eq!(config.cache_path, PathBuf::from("/tmp/vendors.json"));
        assert_eq!(config.registry.url, DEFAULT_REGISTRY_URL);
        assert!(config.registry.timeout().is_none());
    }

    #[test]
    fn test_registry_section() {
        let yaml = "registry:\n  url: file:///srv/oui.txt\n  timeout_secs: 30\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.cache_path, default_cache_path());
        assert_eq!(config.registry.url, "file:///srv/oui.txt");
        assert_eq!(config.registry.timeout(), Some(Duration::from_secs(30)));
        assert!(config.registry.user_agent.starts_with("oui-lookup/"));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.registry.timeout_secs = Some(5);
        config.to_file(path).unwrap();

        let loaded = Config::from_file(path).unwrap();
        assert_eq!(loaded.cache_path, config.cache_path);
        assert_eq!(loaded.registry.timeout_secs, Some(5));
    }
}
