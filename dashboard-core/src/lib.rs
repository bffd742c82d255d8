//! Core types for the Crypto Analysis Dashboard
//!
//! This crate defines the shared data structures used across the dashboard:
//! validated upstream payloads, the display-ready summaries produced from
//! them, and the error taxonomy every layer reports through.

pub mod asset;
pub mod error;
pub mod market;
pub mod repository;
pub mod risk;
pub mod sentiment;

pub use asset::{repository_for_symbol, Asset, Timeframe};
pub use error::{DashboardError, DashboardResult};
pub use market::{HeatmapCell, MarketSeries, MarketSummary, OhlcBar, TimedValue};
pub use repository::{
    CommitPoint, DeveloperBucket, GithubSummary, RepoDescriptor, RepoHealth, RepoMetrics,
    WeeklyCommits,
};
pub use risk::{RiskAssessment, RiskColour};
pub use sentiment::{
    HourCount, PlacedWord, SentimentPoint, SentimentSummary, SocialPost, WordCloud,
};
