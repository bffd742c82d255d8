//! API route definitions

mod dashboard;
mod error;
mod fundamentals;
mod health;
mod market;
mod risk;
mod sentiment;

use axum::Router;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(market::routes())
        .merge(sentiment::routes())
        .merge(fundamentals::routes())
        .merge(risk::routes())
        .merge(dashboard::routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::{Duration, TimeZone, Utc};
    use dashboard_core::{
        Asset, DashboardError, DashboardResult, MarketSeries, RepoDescriptor, RepoMetrics,
        SocialPost, TimedValue, Timeframe, WeeklyCommits,
    };
    use dashboard_feeds::{MarketDataSource, RepositorySource, SocialPostSource};
    use dashboard_services::{CacheConfig, DashboardService, DashboardSources};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Hourly prices 100, 101, ... for the given number of samples
    struct StubMarket {
        samples: usize,
    }

    #[async_trait]
    impl MarketDataSource for StubMarket {
        async fn market_series(
            &self,
            _asset: Asset,
            _timeframe: Timeframe,
        ) -> DashboardResult<MarketSeries> {
            let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
            let samples: Vec<TimedValue> = (0..self.samples)
                .map(|i| TimedValue::new(start + Duration::hours(i as i64), 100.0 + i as f64))
                .collect();
            MarketSeries::new(samples.clone(), samples.clone(), samples)
        }
    }

    struct DownSocial;

    #[async_trait]
    impl SocialPostSource for DownSocial {
        async fn social_posts(
            &self,
            _asset: Asset,
            _timeframe: Timeframe,
        ) -> DashboardResult<Vec<SocialPost>> {
            Err(DashboardError::upstream("Reddit", "status 503"))
        }
    }

    struct StubRepository;

    #[async_trait]
    impl RepositorySource for StubRepository {
        async fn repository_metrics(&self, asset: Asset) -> DashboardResult<RepoMetrics> {
            Ok(RepoMetrics {
                repository: asset.repository().to_string(),
                descriptor: RepoDescriptor {
                    subscribers_count: 4_000,
                    open_issues_count: 12,
                    ..RepoDescriptor::default()
                },
                commit_activity: vec![WeeklyCommits {
                    week_start: Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap(),
                    total: 42,
                }],
            })
        }
    }

    fn app(market_samples: usize) -> Router {
        let sources = DashboardSources {
            market: Arc::new(StubMarket {
                samples: market_samples,
            }),
            social: Arc::new(DownSocial),
            repository: Arc::new(StubRepository),
            risk: None,
        };
        let state = AppState {
            dashboard: Arc::new(DashboardService::new(sources, CacheConfig::default())),
        };

        Router::new().nest("/api", api_routes()).with_state(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_market_panel() {
        let (status, body) = get(app(30), "/api/market/btc?timeframe=24h").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "BTC Market Metrics");
        assert_eq!(body["metrics"][0]["label"], "Current Price");
        assert_eq!(body["metrics"][0]["value"], "$129.00");
        assert_eq!(body["data"]["current_price"], 129.0);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_404() {
        let (status, body) = get(app(30), "/api/market/DOGE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown symbol: DOGE");
    }

    #[tokio::test]
    async fn test_bad_timeframe_is_400() {
        let (status, _) = get(app(30), "/api/sentiment/ETH?timeframe=5y").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_short_series_is_422() {
        let (status, body) = get(app(10), "/api/market/ETH").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().starts_with("Insufficient data"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_502() {
        let (status, _) = get(app(30), "/api/sentiment/ADA").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_risk_without_credential_is_503() {
        let (status, body) = get(app(30), "/api/risk/XRP").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Missing credential: GROQ_API_KEY");
    }

    #[tokio::test]
    async fn test_fundamentals_panel() {
        let (status, body) = get(app(30), "/api/fundamentals/BNB").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"][0]["value"], "4000");
        assert_eq!(body["metrics"][1]["value"], "42");
        assert_eq!(body["data"]["estimated_developer_distribution"][0]["estimated_count"], 400.0);
    }

    #[tokio::test]
    async fn test_dashboard_isolates_failing_panels() {
        let (status, body) = get(app(30), "/api/dashboard/btc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "BTC");
        assert_eq!(body["timeframe"], "7d");
        assert_eq!(body["market"]["status"], "ok");
        assert_eq!(body["market"]["title"], "BTC Market Metrics");
        assert_eq!(body["fundamentals"]["status"], "ok");
        assert_eq!(body["sentiment"]["status"], "error");
        assert_eq!(
            body["sentiment"]["message"],
            "Error fetching sentiment data: Upstream unavailable (Reddit): status 503"
        );
        assert_eq!(body["risk"]["status"], "error");
    }

    #[tokio::test]
    async fn test_health_routes() {
        let (status, body) = get(app(30), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["risk_panel_enabled"], false);
        assert_eq!(body["caches"].as_array().map(Vec::len), Some(4));

        let (status, _) = get(app(30), "/api/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }
}
