//! Market data structures: price-feed input and the market summary

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// A single timestamped sample (price, market cap or volume)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedValue {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TimedValue {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Validated price-feed payload
///
/// Each sequence is time-ordered ascending with finite values. Construct via
/// [`MarketSeries::new`] so the transform layer never sees unchecked data;
/// deserializing goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedMarketSeries")]
pub struct MarketSeries {
    prices: Vec<TimedValue>,
    market_caps: Vec<TimedValue>,
    total_volumes: Vec<TimedValue>,
}

impl MarketSeries {
    pub fn new(
        prices: Vec<TimedValue>,
        market_caps: Vec<TimedValue>,
        total_volumes: Vec<TimedValue>,
    ) -> DashboardResult<Self> {
        validate_sequence("prices", &prices)?;
        validate_sequence("market_caps", &market_caps)?;
        validate_sequence("total_volumes", &total_volumes)?;

        Ok(Self {
            prices,
            market_caps,
            total_volumes,
        })
    }

    pub fn prices(&self) -> &[TimedValue] {
        &self.prices
    }

    pub fn market_caps(&self) -> &[TimedValue] {
        &self.market_caps
    }

    pub fn total_volumes(&self) -> &[TimedValue] {
        &self.total_volumes
    }
}

#[derive(Deserialize)]
struct UncheckedMarketSeries {
    prices: Vec<TimedValue>,
    market_caps: Vec<TimedValue>,
    total_volumes: Vec<TimedValue>,
}

impl TryFrom<UncheckedMarketSeries> for MarketSeries {
    type Error = DashboardError;

    fn try_from(raw: UncheckedMarketSeries) -> DashboardResult<Self> {
        MarketSeries::new(raw.prices, raw.market_caps, raw.total_volumes)
    }
}

fn validate_sequence(name: &str, samples: &[TimedValue]) -> DashboardResult<()> {
    if let Some(bad) = samples.iter().find(|s| !s.value.is_finite()) {
        return Err(DashboardError::malformed(format!(
            "{} contains a non-finite value at {}",
            name, bad.timestamp
        )));
    }

    if samples
        .windows(2)
        .any(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        return Err(DashboardError::malformed(format!(
            "{} is not ordered by timestamp",
            name
        )));
    }

    Ok(())
}

/// One hourly OHLC bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    /// Start of the hour bucket
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Mean traded volume for a (weekday, hour) combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub day: Weekday,
    /// Hour of day, 0-23 (UTC)
    pub hour: u32,
    pub mean_volume: f64,
}

/// Display-ready market metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub current_price: f64,
    /// Percentage change against the sample 24 periods earlier
    pub price_change_24h: f64,
    pub market_cap: f64,
    pub market_cap_change_24h: f64,
    pub volume_24h: f64,
    pub volume_change_24h: f64,
    /// Hourly candles, empty hours dropped
    pub ohlc: Vec<OhlcBar>,
    /// Populated cells only, Monday first then by hour
    pub volume_heatmap: Vec<HeatmapCell>,
}
