//! CoinGecko market chart client
//!
//! Free public API, no authentication required.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashboard_core::{
    Asset, DashboardError, DashboardResult, MarketSeries, TimedValue, Timeframe,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::FeedsConfig;
use crate::http::{build_client, fetch_json};
use crate::source::MarketDataSource;

const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
const SOURCE_NAME: &str = "CoinGecko";

/// CoinGecko API client
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
}

/// Raw `/market_chart` response: `[timestamp_ms, value]` pairs
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<[f64; 2]>,
    market_caps: Vec<[f64; 2]>,
    total_volumes: Vec<[f64; 2]>,
}

impl CoinGeckoClient {
    pub fn new(config: &FeedsConfig) -> DashboardResult<Self> {
        Ok(Self {
            http: build_client(Duration::from_secs(30), &config.user_agent)?,
            base_url: COINGECKO_API_BASE.to_string(),
        })
    }

    /// Fetch hourly price, market-cap and volume history in USD
    #[instrument(skip(self))]
    pub async fn get_market_data(
        &self,
        asset: Asset,
        timeframe: Timeframe,
    ) -> DashboardResult<MarketSeries> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, asset.coingecko_id());
        debug!("[CoinGecko] Fetching market chart from: {}", url);

        let request = self.http.get(&url).query(&market_chart_query(timeframe));

        let raw = fetch_json(request, SOURCE_NAME).await?;
        let series = parse_market_chart(raw)?;

        info!(
            "[CoinGecko] Fetched {} price samples for {} ({})",
            series.prices().len(),
            asset,
            timeframe
        );

        Ok(series)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn market_series(
        &self,
        asset: Asset,
        timeframe: Timeframe,
    ) -> DashboardResult<MarketSeries> {
        self.get_market_data(asset, timeframe).await
    }
}

/// Days to request so the free API returns hourly samples
///
/// CoinGecko picks the granularity from the range: five-minute samples for a
/// single day, hourly from two to ninety days.
fn request_days(timeframe: Timeframe) -> u32 {
    timeframe.days().max(2)
}

/// Granularity is left to CoinGecko; `interval=hourly` is a paid-plan option
fn market_chart_query(timeframe: Timeframe) -> [(&'static str, String); 2] {
    [
        ("vs_currency", "usd".to_string()),
        ("days", request_days(timeframe).to_string()),
    ]
}

/// Validate a raw market chart document into a [`MarketSeries`]
pub fn parse_market_chart(raw: Value) -> DashboardResult<MarketSeries> {
    let chart: MarketChartResponse = serde_json::from_value(raw)
        .map_err(|e| DashboardError::malformed(format!("CoinGecko market chart: {}", e)))?;

    MarketSeries::new(
        to_samples("prices", &chart.prices)?,
        to_samples("market_caps", &chart.market_caps)?,
        to_samples("total_volumes", &chart.total_volumes)?,
    )
}

fn to_samples(name: &str, pairs: &[[f64; 2]]) -> DashboardResult<Vec<TimedValue>> {
    pairs
        .iter()
        .map(|[ms, value]| {
            let timestamp = millis_to_datetime(*ms).ok_or_else(|| {
                DashboardError::malformed(format!("{} has an invalid timestamp: {}", name, ms))
            })?;
            Ok(TimedValue::new(timestamp, *value))
        })
        .collect()
}

fn millis_to_datetime(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64)
}
