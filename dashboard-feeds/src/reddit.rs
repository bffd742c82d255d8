//! Reddit search client for social sentiment
//!
//! Uses the public JSON API; Reddit requires a descriptive user agent.

use async_trait::async_trait;
use chrono::DateTime;
use dashboard_core::{Asset, DashboardError, DashboardResult, SocialPost, Timeframe};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::FeedsConfig;
use crate::http::{build_client, fetch_json};
use crate::source::SocialPostSource;

const REDDIT_API_BASE: &str = "https://api.reddit.com";
const SOURCE_NAME: &str = "Reddit";
const SEARCH_LIMIT: u32 = 100;

/// Reddit API client
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    title: String,
    /// Link posts carry an empty body
    #[serde(default)]
    selftext: String,
    created_utc: f64,
}

impl RedditClient {
    pub fn new(config: &FeedsConfig) -> DashboardResult<Self> {
        Ok(Self {
            http: build_client(Duration::from_secs(30), &config.user_agent)?,
            base_url: REDDIT_API_BASE.to_string(),
        })
    }

    /// Subreddits searched for an asset, in the order results are concatenated
    pub fn subreddits(asset: Asset) -> [String; 3] {
        [
            "cryptocurrency".to_string(),
            asset.symbol().to_lowercase(),
            "cryptomarkets".to_string(),
        ]
    }

    /// Search recent posts mentioning the asset across the tracked subreddits
    #[instrument(skip(self))]
    pub async fn get_sentiment_data(
        &self,
        asset: Asset,
        timeframe: Timeframe,
    ) -> DashboardResult<Vec<SocialPost>> {
        let mut posts = Vec::new();

        for subreddit in Self::subreddits(asset) {
            let url = format!("{}/r/{}/search", self.base_url, subreddit);
            debug!("[Reddit] Searching {} for {}", url, asset);

            let request = self.http.get(&url).query(&[
                ("q", asset.symbol().to_string()),
                ("sort", "new".to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
                ("restrict_sr", "on".to_string()),
                ("t", search_window(timeframe).to_string()),
            ]);

            let raw = fetch_json(request, SOURCE_NAME).await?;
            let batch = parse_listing(raw)?;
            debug!("[Reddit] r/{} returned {} posts", subreddit, batch.len());
            posts.extend(batch);
        }

        info!("[Reddit] Fetched {} posts for {}", posts.len(), asset);
        Ok(posts)
    }
}

#[async_trait]
impl SocialPostSource for RedditClient {
    async fn social_posts(
        &self,
        asset: Asset,
        timeframe: Timeframe,
    ) -> DashboardResult<Vec<SocialPost>> {
        self.get_sentiment_data(asset, timeframe).await
    }
}

/// Reddit's `t` search parameter for a timeframe
fn search_window(timeframe: Timeframe) -> &'static str {
    match timeframe {
        Timeframe::TwentyFourHours => "day",
        Timeframe::SevenDays => "week",
        Timeframe::ThirtyDays => "month",
        Timeframe::NinetyDays => "year",
    }
}

/// Validate a search listing into posts
pub fn parse_listing(raw: Value) -> DashboardResult<Vec<SocialPost>> {
    let listing: Listing = serde_json::from_value(raw)
        .map_err(|e| DashboardError::malformed(format!("Reddit listing: {}", e)))?;

    listing
        .data
        .children
        .into_iter()
        .map(|child| {
            let post = child.data;
            let created_at = DateTime::from_timestamp(post.created_utc as i64, 0).ok_or_else(|| {
                DashboardError::malformed(format!("invalid created_utc: {}", post.created_utc))
            })?;

            Ok(SocialPost {
                title: post.title,
                body: post.selftext,
                created_at,
            })
        })
        .collect()
}
