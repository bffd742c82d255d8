//! Display-ready panels
//!
//! Each panel carries a title, a row of headline metrics already formatted
//! for display, and the full summary for charting.

use serde::Serialize;

use dashboard_core::{Asset, GithubSummary, MarketSummary, RiskAssessment, SentimentSummary};

/// A headline figure with an optional change indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub delta: Option<String>,
}

impl Metric {
    fn new(label: &'static str, value: String, delta: Option<String>) -> Self {
        Self {
            label,
            value,
            delta,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel<T> {
    pub title: String,
    pub metrics: Vec<Metric>,
    pub data: T,
}

pub fn market_panel(asset: Asset, summary: MarketSummary) -> Panel<MarketSummary> {
    Panel {
        title: format!("{} Market Metrics", asset),
        metrics: vec![
            Metric::new(
                "Current Price",
                usd(summary.current_price, 2),
                Some(percent(summary.price_change_24h)),
            ),
            Metric::new(
                "Market Cap",
                usd(summary.market_cap, 0),
                Some(percent(summary.market_cap_change_24h)),
            ),
            Metric::new(
                "24h Volume",
                usd(summary.volume_24h, 0),
                Some(percent(summary.volume_change_24h)),
            ),
        ],
        data: summary,
    }
}

pub fn sentiment_panel(asset: Asset, summary: SentimentSummary) -> Panel<SentimentSummary> {
    Panel {
        title: format!("{} Social Sentiment Analysis", asset),
        metrics: vec![
            Metric::new(
                "Sentiment Score",
                format!("{:.2}", summary.sentiment_score),
                Some(format!("{:.2}", summary.sentiment_change)),
            ),
            Metric::new(
                "Mention Count",
                summary.mention_count.to_string(),
                Some(summary.mention_change.to_string()),
            ),
            Metric::new(
                "Sentiment Strength",
                format!("{:.2}", summary.sentiment_strength),
                Some(percent(summary.strength_change)),
            ),
        ],
        data: summary,
    }
}

pub fn fundamentals_panel(asset: Asset, summary: GithubSummary) -> Panel<GithubSummary> {
    Panel {
        title: format!("{} Technical Fundamentals", asset),
        metrics: vec![
            Metric::new(
                "Active Developers (est.)",
                summary.estimated_active_developers.to_string(),
                Some(percent(summary.developer_change)),
            ),
            Metric::new(
                "Total Commits",
                summary.total_commits.to_string(),
                Some(percent(summary.commit_change)),
            ),
            Metric::new(
                "Open Issues",
                summary.open_issues.to_string(),
                Some(summary.issues_delta.to_string()),
            ),
        ],
        data: summary,
    }
}

/// One bar of the risk score chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBar {
    pub metric: &'static str,
    pub score: u8,
}

/// Risk assessment plus the scores it reported, ready for the bar chart
#[derive(Debug, Clone, Serialize)]
pub struct RiskData {
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub scores: Vec<ScoreBar>,
}

pub fn risk_panel(asset: Asset, assessment: RiskAssessment) -> Panel<RiskData> {
    let amount = |value: Option<f64>, decimals| value.map(|v| usd(v, decimals));
    let scores = assessment
        .scores()
        .into_iter()
        .map(|(metric, score)| ScoreBar { metric, score })
        .collect();

    Panel {
        title: format!("{} Risk Factors", asset),
        metrics: vec![
            Metric::new("Coin", or_na(assessment.ticker.clone()), None),
            Metric::new("Price", or_na(amount(assessment.current_price, 2)), None),
            Metric::new("Market size", or_na(amount(assessment.market_size, 0)), None),
            Metric::new(
                "Market Supply",
                or_na(assessment.market_supply.map(|v| grouped(v, 0))),
                None,
            ),
            Metric::new("Market Cap", or_na(amount(assessment.market_cap, 0)), None),
            Metric::new("24h Volume", or_na(amount(assessment.volume_24h, 0)), None),
        ],
        data: RiskData { assessment, scores },
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn usd(value: f64, decimals: usize) -> String {
    if value < 0.0 {
        format!("-${}", grouped(-value, decimals))
    } else {
        format!("${}", grouped(value, decimals))
    }
}

/// Fixed-point number with comma thousands separators
fn grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut out = String::with_capacity(formatted.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
