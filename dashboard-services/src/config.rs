//! Cache lifetimes per pipeline

use chrono::Duration;
use serde::{Deserialize, Serialize};

use dashboard_core::{DashboardError, DashboardResult};

pub const DEFAULT_MARKET_TTL_SECS: u64 = 300;
pub const DEFAULT_SENTIMENT_TTL_SECS: u64 = 300;
pub const DEFAULT_GITHUB_TTL_SECS: u64 = 3600;
pub const DEFAULT_RISK_TTL_SECS: u64 = 300;

/// Longest accepted cache lifetime (one year)
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// How long each pipeline's results stay cached, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub market_ttl_secs: u64,
    pub sentiment_ttl_secs: u64,
    pub github_ttl_secs: u64,
    pub risk_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            market_ttl_secs: DEFAULT_MARKET_TTL_SECS,
            sentiment_ttl_secs: DEFAULT_SENTIMENT_TTL_SECS,
            github_ttl_secs: DEFAULT_GITHUB_TTL_SECS,
            risk_ttl_secs: DEFAULT_RISK_TTL_SECS,
        }
    }
}

impl CacheConfig {
    /// Load from `MARKET_CACHE_TTL_SECS`, `SENTIMENT_CACHE_TTL_SECS`,
    /// `GITHUB_CACHE_TTL_SECS` and `RISK_CACHE_TTL_SECS`
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        Ok(Self {
            market_ttl_secs: seconds(&lookup, "MARKET_CACHE_TTL_SECS", DEFAULT_MARKET_TTL_SECS)?,
            sentiment_ttl_secs: seconds(
                &lookup,
                "SENTIMENT_CACHE_TTL_SECS",
                DEFAULT_SENTIMENT_TTL_SECS,
            )?,
            github_ttl_secs: seconds(&lookup, "GITHUB_CACHE_TTL_SECS", DEFAULT_GITHUB_TTL_SECS)?,
            risk_ttl_secs: seconds(&lookup, "RISK_CACHE_TTL_SECS", DEFAULT_RISK_TTL_SECS)?,
        })
    }

    pub fn market_ttl(&self) -> Duration {
        to_duration(self.market_ttl_secs)
    }

    pub fn sentiment_ttl(&self) -> Duration {
        to_duration(self.sentiment_ttl_secs)
    }

    pub fn github_ttl(&self) -> Duration {
        to_duration(self.github_ttl_secs)
    }

    pub fn risk_ttl(&self) -> Duration {
        to_duration(self.risk_ttl_secs)
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> DashboardResult<u64> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let secs: u64 = raw.trim().parse().map_err(|_| {
        DashboardError::config(format!("{} must be a whole number of seconds, got {:?}", key, raw))
    })?;

    if secs > MAX_CACHE_TTL_SECS {
        return Err(DashboardError::config(format!(
            "{} must be at most {} seconds, got {}",
            key, MAX_CACHE_TTL_SECS, secs
        )));
    }

    Ok(secs)
}

/// Fields are public, so values set in code are clamped as well
fn to_duration(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_CACHE_TTL_SECS) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = CacheConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CacheConfig::default());
        assert_eq!(config.market_ttl(), Duration::minutes(5));
        assert_eq!(config.github_ttl(), Duration::minutes(60));
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = CacheConfig::from_lookup(|key| match key {
            "GITHUB_CACHE_TTL_SECS" => Some(" 120 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.github_ttl(), Duration::minutes(2));
        assert_eq!(config.risk_ttl_secs, DEFAULT_RISK_TTL_SECS);

        let invalid = CacheConfig::from_lookup(|key| match key {
            "MARKET_CACHE_TTL_SECS" => Some("five minutes".to_string()),
            _ => None,
        });
        assert!(matches!(invalid, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_rejects_ttl_beyond_one_year() {
        let huge = CacheConfig::from_lookup(|key| match key {
            "GITHUB_CACHE_TTL_SECS" => Some("100000000000000".to_string()),
            _ => None,
        });
        assert!(matches!(huge, Err(DashboardError::Config(msg)) if msg.contains("GITHUB_CACHE_TTL_SECS")));

        let year = CacheConfig::from_lookup(|key| match key {
            "RISK_CACHE_TTL_SECS" => Some(MAX_CACHE_TTL_SECS.to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(year.risk_ttl(), Duration::days(365));
    }

    #[test]
    fn test_ttl_set_in_code_is_clamped() {
        let config = CacheConfig {
            github_ttl_secs: u64::MAX,
            ..CacheConfig::default()
        };
        assert_eq!(config.github_ttl(), Duration::days(365));
    }
}
