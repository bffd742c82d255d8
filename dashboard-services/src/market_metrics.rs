//! Market metrics transform
//!
//! Turns a validated price-feed series into the headline metrics, hourly
//! candles and the volume heatmap.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use std::collections::BTreeMap;

use dashboard_core::{
    DashboardError, DashboardResult, HeatmapCell, MarketSeries, MarketSummary, OhlcBar,
    TimedValue,
};

/// Samples between "now" and "24h ago" on an hourly series
pub const PERIODS_24H: usize = 24;

const SECONDS_PER_HOUR: i64 = 3600;

/// Build the market summary from a price-feed series
pub fn process_market_data(series: &MarketSeries) -> DashboardResult<MarketSummary> {
    let price_change_24h = change_24h("prices", series.prices())?;
    let market_cap_change_24h = change_24h("market_caps", series.market_caps())?;
    let volume_change_24h = change_24h("total_volumes", series.total_volumes())?;

    Ok(MarketSummary {
        current_price: latest("prices", series.prices())?,
        price_change_24h,
        market_cap: latest("market_caps", series.market_caps())?,
        market_cap_change_24h,
        volume_24h: latest("total_volumes", series.total_volumes())?,
        volume_change_24h,
        ohlc: hourly_ohlc(series.prices()),
        volume_heatmap: volume_heatmap(series.total_volumes()),
    })
}

fn latest(name: &str, samples: &[TimedValue]) -> DashboardResult<f64> {
    samples
        .last()
        .map(|s| s.value)
        .ok_or_else(|| DashboardError::insufficient(format!("{} is empty", name)))
}

/// Percentage change of the last sample against the one 24 periods earlier
pub fn change_24h(name: &str, samples: &[TimedValue]) -> DashboardResult<f64> {
    if samples.len() <= PERIODS_24H {
        return Err(DashboardError::insufficient(format!(
            "{} needs at least {} samples for a 24h change, got {}",
            name,
            PERIODS_24H + 1,
            samples.len()
        )));
    }

    let last = samples.len() - 1;
    let current = samples[last].value;
    let previous = samples[last - PERIODS_24H].value;

    if previous == 0.0 {
        return Err(DashboardError::division_by_zero(format!(
            "{} was zero 24 periods ago",
            name
        )));
    }

    Ok((current - previous) / previous * 100.0)
}

/// Group prices into UTC hour buckets; empty hours produce no bar
pub fn hourly_ohlc(prices: &[TimedValue]) -> Vec<OhlcBar> {
    let mut buckets: BTreeMap<i64, OhlcBar> = BTreeMap::new();

    for sample in prices {
        let bucket = sample.timestamp.timestamp().div_euclid(SECONDS_PER_HOUR) * SECONDS_PER_HOUR;

        buckets
            .entry(bucket)
            .and_modify(|bar| {
                bar.high = bar.high.max(sample.value);
                bar.low = bar.low.min(sample.value);
                bar.close = sample.value;
            })
            .or_insert_with(|| OhlcBar {
                timestamp: DateTime::from_timestamp(bucket, 0).unwrap_or(sample.timestamp),
                open: sample.value,
                high: sample.value,
                low: sample.value,
                close: sample.value,
            });
    }

    buckets.into_values().collect()
}

/// Mean volume per (weekday, hour); combinations without samples are omitted
pub fn volume_heatmap(volumes: &[TimedValue]) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<(u32, u32), (Weekday, f64, usize)> = BTreeMap::new();

    for sample in volumes {
        let ts: DateTime<Utc> = sample.timestamp;
        let day = ts.weekday();
        let key = (day.num_days_from_monday(), ts.hour());

        let cell = cells.entry(key).or_insert((day, 0.0, 0));
        cell.1 += sample.value;
        cell.2 += 1;
    }

    cells
        .into_iter()
        .map(|((_, hour), (day, sum, count))| HeatmapCell {
            day,
            hour,
            mean_volume: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        // Monday
        Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
    }

    fn hourly(values: &[f64]) -> Vec<TimedValue> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TimedValue::new(base_time() + Duration::hours(i as i64), *v))
            .collect()
    }

    fn series(values: &[f64]) -> MarketSeries {
        MarketSeries::new(hourly(values), hourly(values), hourly(values)).unwrap()
    }

    #[test]
    fn test_price_change_against_sample_24_periods_ago() {
        let mut values = vec![100.0];
        values.extend(std::iter::repeat(105.0).take(23));
        values.push(110.0);
        assert_eq!(values.len(), 25);

        let summary = process_market_data(&series(&values)).unwrap();
        assert_eq!(summary.current_price, 110.0);
        assert!((summary.price_change_24h - 10.0).abs() < 1e-12);
        assert!((summary.market_cap_change_24h - 10.0).abs() < 1e-12);
        assert!((summary.volume_change_24h - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_price_change_matches_closed_form() {
        let values: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.37).sin() * 7.0).collect();
        let summary = process_market_data(&series(&values)).unwrap();

        let latest = values[values.len() - 1];
        let earlier = values[values.len() - 25];
        assert_eq!(summary.price_change_24h, (latest - earlier) / earlier * 100.0);
    }

    #[test]
    fn test_fewer_than_25_samples_is_insufficient() {
        let values = vec![100.0; 24];
        assert!(matches!(
            process_market_data(&series(&values)),
            Err(DashboardError::InsufficientData(_))
        ));
        assert!(matches!(
            process_market_data(&series(&[])),
            Err(DashboardError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_zero_divisor_fails_explicitly() {
        let mut values = vec![0.0];
        values.extend(std::iter::repeat(1.0).take(24));
        assert!(matches!(
            process_market_data(&series(&values)),
            Err(DashboardError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_short_volume_series_is_insufficient() {
        let prices = hourly(&[1.0; 30]);
        let volumes = hourly(&[1.0; 10]);
        let series = MarketSeries::new(prices.clone(), prices, volumes).unwrap();
        assert!(matches!(
            process_market_data(&series),
            Err(DashboardError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_ohlc_buckets_by_hour_and_drops_gaps() {
        let t = base_time();
        let prices = vec![
            TimedValue::new(t + Duration::minutes(5), 10.0),
            TimedValue::new(t + Duration::minutes(20), 12.0),
            TimedValue::new(t + Duration::minutes(40), 9.0),
            TimedValue::new(t + Duration::minutes(55), 11.0),
            // hour 1 has no samples
            TimedValue::new(t + Duration::minutes(130), 20.0),
        ];

        let bars = hourly_ohlc(&prices);
        assert_eq!(bars.len(), 2);

        assert_eq!(bars[0].timestamp, t);
        assert_eq!(
            (bars[0].open, bars[0].high, bars[0].low, bars[0].close),
            (10.0, 12.0, 9.0, 11.0)
        );

        assert_eq!(bars[1].timestamp, t + Duration::hours(2));
        assert_eq!((bars[1].open, bars[1].close), (20.0, 20.0));
    }

    #[test]
    fn test_transform_is_pure() {
        let values: Vec<f64> = (0..48).map(|i| 100.0 + i as f64).collect();
        let input = series(&values);
        let first = process_market_data(&input).unwrap();
        let second = process_market_data(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.ohlc.len(), 48);
    }

    #[test]
    fn test_volume_heatmap_means_per_day_and_hour() {
        let monday = base_time();
        let volumes = vec![
            TimedValue::new(monday + Duration::hours(3), 10.0),
            TimedValue::new(monday + Duration::hours(3) + Duration::minutes(30), 20.0),
            TimedValue::new(monday + Duration::days(7) + Duration::hours(3), 30.0),
            TimedValue::new(monday + Duration::days(1) + Duration::hours(5), 7.0),
        ];

        let cells = volume_heatmap(&volumes);
        assert_eq!(cells.len(), 2);

        assert_eq!(cells[0].day, Weekday::Mon);
        assert_eq!(cells[0].hour, 3);
        assert_eq!(cells[0].mean_volume, 20.0);

        assert_eq!(cells[1].day, Weekday::Tue);
        assert_eq!(cells[1].hour, 5);
        assert_eq!(cells[1].mean_volume, 7.0);
    }
}
