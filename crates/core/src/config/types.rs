use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::catalog::PexelsConfig;

/// Root configuration
///
/// Every value can be overridden from the environment with the
/// `PHOTOCACHE_` prefix and `__` between nesting levels, e.g.
/// `PHOTOCACHE_PEXELS__API_KEY`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pexels: PexelsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("photocache.db")
}

/// Cache behaviour
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age after which non-favorite rows are swept (default: 24h)
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,
    /// Number of recent queries kept (default: 10)
    #[serde(default = "default_recent_query_limit")]
    pub recent_query_limit: usize,
    /// Page size used when the caller does not pass one (default: 15)
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_ms: default_max_age_ms(),
            recent_query_limit: default_recent_query_limit(),
            default_per_page: default_per_page(),
        }
    }
}

fn default_max_age_ms() -> u64 {
    86_400_000
}

fn default_recent_query_limit() -> usize {
    10
}

fn default_per_page() -> u32 {
    15
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pexels: SanitizedPexelsConfig,
    pub cache: CacheConfig,
}

/// Sanitized Pexels config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPexelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            pexels: SanitizedPexelsConfig {
                base_url: config.pexels.base_url.clone(),
                api_key_configured: !config.pexels.api_key.trim().is_empty(),
                timeout_secs: config.pexels.timeout_secs,
            },
            cache: config.cache.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "photocache.db");
        assert_eq!(config.cache.max_age_ms, 86_400_000);
        assert_eq!(config.cache.recent_query_limit, 10);
        assert_eq!(config.cache.default_per_page, 15);
        assert!(config.pexels.api_key.is_empty());
        assert_eq!(config.pexels.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "/data/photos.sqlite"

[pexels]
api_key = "secret"
base_url = "http://localhost:9999"
timeout_secs = 5

[cache]
max_age_ms = 3600000
recent_query_limit = 20
default_per_page = 30
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path.to_str().unwrap(), "/data/photos.sqlite");
        assert_eq!(config.pexels.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.pexels.timeout_secs, 5);
        assert_eq!(config.cache.max_age_ms, 3_600_000);
        assert_eq!(config.cache.recent_query_limit, 20);
        assert_eq!(config.cache.default_per_page, 30);
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let config: Config = toml::from_str(
            r#"
[pexels]
api_key = "super-secret"
"#,
        )
        .unwrap();

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.pexels.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!json.contains("base_url"));
    }

    #[test]
    fn test_sanitized_config_without_key() {
        let config: Config = toml::from_str("").unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(!sanitized.pexels.api_key_configured);
        assert_eq!(sanitized.cache, CacheConfig::default());
    }
}
