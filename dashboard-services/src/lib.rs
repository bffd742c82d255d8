//! Transform pipeline and orchestration for the Crypto Analysis Dashboard
//!
//! The transforms (`process_market_data`, `process_sentiment_data`,
//! `process_github_data`) are pure functions from validated upstream payloads
//! to display-ready summaries. `DashboardService` puts a TTL cache in front of
//! each upstream source and runs the matching transform on every call.

pub mod clock;
pub mod config;
pub mod dashboard_service;
pub mod market_metrics;
pub mod sentiment;
pub mod technical_fundamentals;
pub mod ttl_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use dashboard_service::{DashboardService, DashboardSources};
pub use market_metrics::process_market_data;
pub use sentiment::{process_sentiment_data, LexiconScorer, PolarityScorer};
pub use technical_fundamentals::process_github_data;
pub use ttl_cache::{CacheStats, TtlCache};
