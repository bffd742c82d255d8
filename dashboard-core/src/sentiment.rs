//! Social sentiment structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A social post mentioning an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    pub title: String,
    /// Post body (empty for link posts)
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl SocialPost {
    /// Title and body joined into the text that gets scored
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// Polarity of one post on the sentiment trend line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub timestamp: DateTime<Utc>,
    pub sentiment: f64,
}

/// Number of posts created during an hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    /// Hour of day, 0-23 (UTC)
    pub hour: u32,
    pub count: usize,
}

/// A word placed on the word cloud canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub text: String,
    pub frequency: usize,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
}

/// Rendered word cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    pub width: u32,
    pub height: u32,
    pub words: Vec<PlacedWord>,
    /// SVG document of the rendered cloud
    pub svg: String,
}

/// Display-ready sentiment metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean polarity in [-1, 1]
    pub sentiment_score: f64,
    /// Mean of the last 10 polarities minus the mean of the rest
    pub sentiment_change: f64,
    pub mention_count: usize,
    /// Posts created within the last 24 hours
    pub mention_change: i64,
    /// |mean polarity| × 100
    pub sentiment_strength: f64,
    pub strength_change: f64,
    pub sentiment_trend: Vec<SentimentPoint>,
    pub word_cloud: WordCloud,
    pub mention_frequency: Vec<HourCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_text_joins_title_and_body() {
        let post = SocialPost {
            title: "BTC moons".to_string(),
            body: "great day".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(post.text(), "BTC moons great day");
    }
}
