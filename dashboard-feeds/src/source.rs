//! Fetch-layer contracts
//!
//! Each upstream is reached through one of these traits so the service layer
//! can be exercised against stubs.

use async_trait::async_trait;
use dashboard_core::{
    Asset, DashboardResult, MarketSeries, RepoMetrics, RiskAssessment, SocialPost, Timeframe,
};

/// Price, market-cap and volume history
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn market_series(&self, asset: Asset, timeframe: Timeframe)
        -> DashboardResult<MarketSeries>;
}

/// Social posts mentioning an asset
#[async_trait]
pub trait SocialPostSource: Send + Sync {
    async fn social_posts(&self, asset: Asset, timeframe: Timeframe)
        -> DashboardResult<Vec<SocialPost>>;
}

/// Repository counters and weekly commit activity
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn repository_metrics(&self, asset: Asset) -> DashboardResult<RepoMetrics>;
}

/// LLM-generated risk assessment
#[async_trait]
pub trait RiskAssessmentSource: Send + Sync {
    async fn risk_assessment(&self, asset: Asset) -> DashboardResult<RiskAssessment>;
}
