//! Server configuration, read once at start-up

use dashboard_core::{DashboardError, DashboardResult};
use dashboard_feeds::{FeedsConfig, GroqConfig};
use dashboard_services::CacheConfig;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub feeds: FeedsConfig,
    /// None when `GROQ_API_KEY` is not set; the risk panel is then unavailable
    pub groq: Option<GroqConfig>,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                DashboardError::config(format!("SERVER_PORT must be a port number, got {:?}", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let groq = match GroqConfig::from_lookup(&lookup) {
            Ok(config) => Some(config),
            Err(DashboardError::MissingCredential(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            port,
            feeds: FeedsConfig::from_lookup(&lookup),
            groq,
            cache: CacheConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.groq.is_none());
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn test_reads_port_and_credentials() {
        let config = AppConfig::from_lookup(|key| match key {
            "SERVER_PORT" => Some("8080".to_string()),
            "GROQ_API_KEY" => Some("gsk_test".to_string()),
            "RISK_CACHE_TTL_SECS" => Some("60".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.groq.map(|g| g.api_key), Some("gsk_test".to_string()));
        assert_eq!(config.cache.risk_ttl_secs, 60);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let result = AppConfig::from_lookup(|key| match key {
            "SERVER_PORT" => Some("http".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }
}
