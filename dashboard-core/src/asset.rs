//! Supported crypto assets and request timeframes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DashboardError, DashboardResult};

/// Symbol → GitHub repository lookup table
const REPOSITORIES: [(&str, &str); 5] = [
    ("BTC", "bitcoin/bitcoin"),
    ("ETH", "ethereum/go-ethereum"),
    ("BNB", "bnb-chain/bsc"),
    ("XRP", "ripple/rippled"),
    ("ADA", "cardano-foundation/cardano-node"),
];

/// Map a ticker symbol to the repository tracked for its developer activity
///
/// Matching is exact (upper-case tickers), like the dashboard selector.
pub fn repository_for_symbol(symbol: &str) -> DashboardResult<&'static str> {
    REPOSITORIES
        .iter()
        .find(|(ticker, _)| *ticker == symbol)
        .map(|(_, repo)| *repo)
        .ok_or_else(|| DashboardError::unknown_symbol(symbol))
}

/// Cryptocurrencies selectable in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Bnb,
    Xrp,
    Ada,
}

impl Asset {
    pub const ALL: [Asset; 5] = [Asset::Btc, Asset::Eth, Asset::Bnb, Asset::Xrp, Asset::Ada];

    /// Ticker symbol (e.g. "BTC")
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Bnb => "BNB",
            Asset::Xrp => "XRP",
            Asset::Ada => "ADA",
        }
    }

    /// CoinGecko coin id used by the market chart endpoint
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::Btc => "bitcoin",
            Asset::Eth => "ethereum",
            Asset::Bnb => "binancecoin",
            Asset::Xrp => "ripple",
            Asset::Ada => "cardano",
        }
    }

    /// GitHub repository (`owner/name`) for developer metrics
    pub fn repository(&self) -> &'static str {
        match self {
            Asset::Btc => REPOSITORIES[0].1,
            Asset::Eth => REPOSITORIES[1].1,
            Asset::Bnb => REPOSITORIES[2].1,
            Asset::Xrp => REPOSITORIES[3].1,
            Asset::Ada => REPOSITORIES[4].1,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for Asset {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Asset::ALL
            .into_iter()
            .find(|asset| asset.symbol() == upper)
            .ok_or_else(|| DashboardError::unknown_symbol(s))
    }
}

/// Lookback window for market and sentiment requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[default]
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
}

impl Timeframe {
    /// Number of days requested from the price feed
    pub fn days(&self) -> u32 {
        match self {
            Timeframe::TwentyFourHours => 1,
            Timeframe::SevenDays => 7,
            Timeframe::ThirtyDays => 30,
            Timeframe::NinetyDays => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::TwentyFourHours => "24h",
            Timeframe::SevenDays => "7d",
            Timeframe::ThirtyDays => "30d",
            Timeframe::NinetyDays => "90d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "24h" | "1d" => Ok(Timeframe::TwentyFourHours),
            "7d" => Ok(Timeframe::SevenDays),
            "30d" => Ok(Timeframe::ThirtyDays),
            "90d" => Ok(Timeframe::NinetyDays),
            _ => Err(DashboardError::config(format!("Unknown timeframe: {}", s))),
        }
    }
}
