//! Dashboard service: cached fetch followed by the matching transform

use std::sync::Arc;
use tracing::{info, instrument};

use dashboard_core::{
    Asset, DashboardError, DashboardResult, GithubSummary, MarketSeries, MarketSummary,
    RepoMetrics, RiskAssessment, SentimentSummary, SocialPost, Timeframe,
};
use dashboard_feeds::{MarketDataSource, RepositorySource, RiskAssessmentSource, SocialPostSource};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::market_metrics::process_market_data;
use crate::sentiment::{process_sentiment_data, LexiconScorer, PolarityScorer};
use crate::technical_fundamentals::process_github_data;
use crate::ttl_cache::{CacheStats, TtlCache};

/// Upstream sources the service reads from
///
/// The risk source is optional: without an LLM credential the risk panel
/// reports `MissingCredential` while the other panels keep working.
#[derive(Clone)]
pub struct DashboardSources {
    pub market: Arc<dyn MarketDataSource>,
    pub social: Arc<dyn SocialPostSource>,
    pub repository: Arc<dyn RepositorySource>,
    pub risk: Option<Arc<dyn RiskAssessmentSource>>,
}

/// Fetches, caches and transforms the data behind each dashboard panel
///
/// Raw upstream payloads are cached per key; transforms run on every call
/// so time-relative figures follow the clock.
pub struct DashboardService {
    sources: DashboardSources,
    scorer: Arc<dyn PolarityScorer>,
    clock: Arc<dyn Clock>,
    ttls: CacheConfig,
    market_cache: TtlCache<(Asset, Timeframe), MarketSeries>,
    social_cache: TtlCache<(Asset, Timeframe), Vec<SocialPost>>,
    repository_cache: TtlCache<Asset, RepoMetrics>,
    risk_cache: TtlCache<Asset, RiskAssessment>,
}

impl DashboardService {
    pub fn new(sources: DashboardSources, ttls: CacheConfig) -> Self {
        Self::with_clock(sources, ttls, Arc::new(SystemClock))
    }

    pub fn with_clock(sources: DashboardSources, ttls: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            sources,
            scorer: Arc::new(LexiconScorer::new()),
            market_cache: TtlCache::with_clock("MarketCache", clock.clone()),
            social_cache: TtlCache::with_clock("SocialCache", clock.clone()),
            repository_cache: TtlCache::with_clock("RepositoryCache", clock.clone()),
            risk_cache: TtlCache::with_clock("RiskCache", clock.clone()),
            clock,
            ttls,
        }
    }

    pub fn has_risk_source(&self) -> bool {
        self.sources.risk.is_some()
    }

    #[instrument(skip(self))]
    pub async fn market_summary(
        &self,
        asset: Asset,
        timeframe: Timeframe,
    ) -> DashboardResult<MarketSummary> {
        let source = Arc::clone(&self.sources.market);
        let series = self
            .market_cache
            .get_or_fetch((asset, timeframe), self.ttls.market_ttl(), move || async move {
                info!("[Dashboard] Fetching market data for {} ({})", asset, timeframe);
                source.market_series(asset, timeframe).await
            })
            .await?;

        process_market_data(&series)
    }

    #[instrument(skip(self))]
    pub async fn sentiment_summary(
        &self,
        asset: Asset,
        timeframe: Timeframe,
    ) -> DashboardResult<SentimentSummary> {
        let source = Arc::clone(&self.sources.social);
        let posts = self
            .social_cache
            .get_or_fetch((asset, timeframe), self.ttls.sentiment_ttl(), move || async move {
                info!("[Dashboard] Fetching social posts for {} ({})", asset, timeframe);
                source.social_posts(asset, timeframe).await
            })
            .await?;

        process_sentiment_data(&posts, self.scorer.as_ref(), self.clock.now())
    }

    #[instrument(skip(self))]
    pub async fn github_summary(&self, asset: Asset) -> DashboardResult<GithubSummary> {
        let source = Arc::clone(&self.sources.repository);
        let metrics = self
            .repository_cache
            .get_or_fetch(asset, self.ttls.github_ttl(), move || async move {
                info!("[Dashboard] Fetching repository metrics for {}", asset);
                source.repository_metrics(asset).await
            })
            .await?;

        Ok(process_github_data(&metrics))
    }

    #[instrument(skip(self))]
    pub async fn risk_assessment(&self, asset: Asset) -> DashboardResult<RiskAssessment> {
        let source = self
            .sources
            .risk
            .clone()
            .ok_or_else(|| DashboardError::missing_credential("GROQ_API_KEY"))?;

        self.risk_cache
            .get_or_fetch(asset, self.ttls.risk_ttl(), move || async move {
                info!("[Dashboard] Requesting risk assessment for {}", asset);
                source.risk_assessment(asset).await
            })
            .await
    }

    pub fn cache_stats(&self) -> Vec<CacheStats> {
        vec![
            self.market_cache.stats(),
            self.social_cache.stats(),
            self.repository_cache.stats(),
            self.risk_cache.stats(),
        ]
    }

    /// Drop expired entries from every cache
    pub fn purge_expired(&self) -> usize {
        self.market_cache.purge_expired()
            + self.social_cache.purge_expired()
            + self.repository_cache.purge_expired()
            + self.risk_cache.purge_expired()
    }
}
