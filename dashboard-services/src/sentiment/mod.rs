//! Social sentiment transform
//!
//! Scores each post, compares the most recent posts against the rest and
//! builds the trend line, hourly mention counts and word cloud.

pub mod polarity;
pub mod word_cloud;

pub use polarity::{LexiconScorer, PolarityScorer};
pub use word_cloud::{render_word_cloud, word_frequencies};

use chrono::{DateTime, Duration, Timelike, Utc};
use std::collections::BTreeMap;

use dashboard_core::{
    DashboardError, DashboardResult, HourCount, SentimentPoint, SentimentSummary, SocialPost,
};

/// Posts at the end of the batch treated as "recent"
pub const RECENT_POSTS: usize = 10;

/// Build the sentiment summary for a batch of posts
///
/// Posts are scored in the order given; the last [`RECENT_POSTS`] of them are
/// compared against the rest. `now` anchors the 24 hour mention window and
/// the trend timestamps.
pub fn process_sentiment_data(
    posts: &[SocialPost],
    scorer: &dyn PolarityScorer,
    now: DateTime<Utc>,
) -> DashboardResult<SentimentSummary> {
    if posts.is_empty() {
        return Err(DashboardError::insufficient("no social posts to score"));
    }

    let texts: Vec<String> = posts.iter().map(SocialPost::text).collect();
    let polarities: Vec<f64> = texts.iter().map(|t| scorer.polarity(t)).collect();

    let split = polarities.len().saturating_sub(RECENT_POSTS);
    let (earlier, recent) = polarities.split_at(split);

    let sentiment_score = mean(&polarities);
    let sentiment_change = mean(recent) - mean(earlier);
    let strength_change = (mean(recent).abs() - mean(earlier).abs()) * 100.0;

    let day_ago = now - Duration::hours(24);
    let older = posts.iter().filter(|p| p.created_at < day_ago).count();
    let mention_change = posts.len() as i64 - older as i64;

    Ok(SentimentSummary {
        sentiment_score,
        sentiment_change,
        mention_count: posts.len(),
        mention_change,
        sentiment_strength: sentiment_score.abs() * 100.0,
        strength_change,
        sentiment_trend: trend(&polarities, now),
        word_cloud: render_word_cloud(&texts.join(" ")),
        mention_frequency: mention_frequency(posts),
    })
}

/// Mean of the values, 0 for an empty slice
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// One point per post, spaced hourly and ending at `now`
fn trend(polarities: &[f64], now: DateTime<Utc>) -> Vec<SentimentPoint> {
    let last = polarities.len() as i64 - 1;
    polarities
        .iter()
        .enumerate()
        .map(|(i, sentiment)| SentimentPoint {
            timestamp: now - Duration::hours(last - i as i64),
            sentiment: *sentiment,
        })
        .collect()
}

/// Posts per UTC hour of day; hours without posts are omitted
fn mention_frequency(posts: &[SocialPost]) -> Vec<HourCount> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for post in posts {
        *counts.entry(post.created_at.hour()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}
