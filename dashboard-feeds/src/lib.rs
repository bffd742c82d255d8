//! Upstream API clients for the Crypto Analysis Dashboard
//!
//! One client per data source. Every client validates its raw response into
//! the typed records from `dashboard-core` before handing it on, failing with
//! `MalformedPayload` when the upstream shape is wrong.

pub mod coingecko;
pub mod config;
pub mod github;
pub mod groq;
mod http;
pub mod reddit;
pub mod source;

pub use coingecko::CoinGeckoClient;
pub use config::{FeedsConfig, GroqConfig};
pub use github::GitHubClient;
pub use groq::GroqClient;
pub use reddit::RedditClient;
pub use source::{MarketDataSource, RepositorySource, RiskAssessmentSource, SocialPostSource};
