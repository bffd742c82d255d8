//! LLM risk assessment structures
//!
//! The completion service returns best-effort JSON. Nothing in it is trusted:
//! [`RiskAssessment::from_value`] keeps only fields with a usable type and range.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

use crate::error::{DashboardError, DashboardResult};

/// Traffic-light flag for an asset's overall risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColour {
    Red,
    Amber,
    Green,
}

impl RiskColour {
    /// Derive a colour from the 1-100 promise/risk score (higher is more promising)
    pub fn from_score(score: u8) -> Self {
        match score {
            67..=u8::MAX => RiskColour::Green,
            34..=66 => RiskColour::Amber,
            _ => RiskColour::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskColour::Red => "red",
            RiskColour::Amber => "amber",
            RiskColour::Green => "green",
        }
    }
}

impl fmt::Display for RiskColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RiskColour {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(RiskColour::Red),
            "amber" | "yellow" | "orange" => Ok(RiskColour::Amber),
            "green" => Ok(RiskColour::Green),
            _ => Err(DashboardError::malformed(format!("Unknown risk colour: {}", s))),
        }
    }
}

/// Validated risk and fundamentals summary for an asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub coin: Option<String>,
    pub ticker: Option<String>,
    pub founded: Option<String>,
    pub market_size: Option<f64>,
    pub current_price: Option<f64>,
    pub metrics_to_consider: Vec<String>,
    pub market_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub risk_flags: Vec<String>,
    pub key_strengths: Vec<String>,
    pub security_score: Option<u8>,
    pub liquidity_score: Option<u8>,
    pub volatility_score: Option<u8>,
    /// Overall promise/risk score, 1-100
    pub promise_risk_score: Option<u8>,
    pub risk_colour: Option<RiskColour>,
}

impl RiskAssessment {
    /// Build an assessment from an untrusted JSON document
    ///
    /// Fails only when the document is not an object. Individual fields with
    /// the wrong type or an out-of-range value are dropped and logged.
    pub fn from_value(value: &Value) -> DashboardResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            DashboardError::malformed("risk assessment is not a JSON object")
        })?;

        let promise_risk_score = score_field(obj, "promise_risk_score", 1);
        let risk_colour = text_field(obj, &["risk_colour", "risk_color"])
            .and_then(|raw| match raw.parse::<RiskColour>() {
                Ok(colour) => Some(colour),
                Err(e) => {
                    warn!("Ignoring risk colour: {}", e);
                    None
                }
            })
            .or_else(|| promise_risk_score.map(RiskColour::from_score));

        Ok(Self {
            coin: text_field(obj, &["coin"]),
            ticker: text_field(obj, &["ticker"]),
            founded: text_field(obj, &["founded"]),
            market_size: amount_field(obj, "market_size"),
            current_price: amount_field(obj, "current_price"),
            metrics_to_consider: list_field(obj, "metrics_to_consider"),
            market_supply: amount_field(obj, "market_supply"),
            max_supply: amount_field(obj, "max_supply"),
            market_cap: amount_field(obj, "market_cap"),
            volume_24h: amount_field(obj, "24_hour_volume"),
            risk_flags: list_field(obj, "risk_flags"),
            key_strengths: list_field(obj, "key_strengths"),
            security_score: score_field(obj, "security_score", 0),
            liquidity_score: score_field(obj, "liquidity_score", 0),
            volatility_score: score_field(obj, "volatility_score", 0),
            promise_risk_score,
            risk_colour,
        })
    }

    /// Every score that is present, for the score bar chart
    pub fn scores(&self) -> Vec<(&'static str, u8)> {
        [
            ("security_score", self.security_score),
            ("liquidity_score", self.liquidity_score),
            ("volatility_score", self.volatility_score),
            ("promise_risk_score", self.promise_risk_score),
        ]
        .into_iter()
        .filter_map(|(name, score)| score.map(|s| (name, s)))
        .collect()
    }
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse a number that may arrive as a JSON number or as text like "$1,234.5"
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%' | ' ' | '_'))
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn amount_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let raw = obj.get(key)?;
    match parse_number(raw) {
        Some(n) if n >= 0.0 => Some(n),
        _ => {
            if !raw.is_null() {
                warn!("Dropping risk field {}: unusable value {}", key, raw);
            }
            None
        }
    }
}

fn score_field(obj: &Map<String, Value>, key: &str, min: u8) -> Option<u8> {
    let raw = obj.get(key)?;
    match parse_number(raw) {
        Some(n) if n >= min as f64 && n <= 100.0 => Some(n.round() as u8),
        _ => {
            if !raw.is_null() {
                warn!("Dropping risk score {}: unusable value {}", key, raw);
            }
            None
        }
    }
}

fn list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_well_formed_payload() {
        let payload = json!({
            "coin": "ETH",
            "ticker": "ETH",
            "founded": "2014-07-30T00:00:00.000Z",
            "market_size": 24022038474.1443,
            "current_price": 3957.7603,
            "metrics_to_consider": ["Burn Rate", "Miner Distribution"],
            "market_supply": 1122334521345.0,
            "max_supply": 124333453545.0,
            "market_cap": 454543345334.0,
            "24_hour_volume": 125445454534.0,
            "risk_flags": ["Burn Rate"],
            "key_strengths": ["Strong security track record"],
            "security_score": 60,
            "liquidity_score": 80,
            "volatility_score": 90,
            "promise_risk_score": 85,
            "risk_colour": "amber"
        });

        let assessment = RiskAssessment::from_value(&payload).unwrap();
        assert_eq!(assessment.ticker.as_deref(), Some("ETH"));
        assert_eq!(assessment.volume_24h, Some(125445454534.0));
        assert_eq!(assessment.risk_flags, vec!["Burn Rate".to_string()]);
        assert_eq!(assessment.promise_risk_score, Some(85));
        // Explicit colour wins over the score-derived one
        assert_eq!(assessment.risk_colour, Some(RiskColour::Amber));
        assert_eq!(assessment.scores().len(), 4);
    }

    #[test]
    fn test_tolerates_wrong_types() {
        let payload = json!({
            "ticker": "BTC",
            "current_price": "$64,250.10",
            "market_cap": "unknown",
            "security_score": "high",
            "liquidity_score": 250,
            "volatility_score": "70",
            "risk_flags": "Regulation",
            "key_strengths": [1, "Liquidity", null],
            "promise_risk_score": 20
        });

        let assessment = RiskAssessment::from_value(&payload).unwrap();
        assert_eq!(assessment.current_price, Some(64250.10));
        assert_eq!(assessment.market_cap, None);
        assert_eq!(assessment.security_score, None);
        assert_eq!(assessment.liquidity_score, None);
        assert_eq!(assessment.volatility_score, Some(70));
        assert_eq!(assessment.risk_flags, vec!["Regulation".to_string()]);
        assert_eq!(assessment.key_strengths, vec!["Liquidity".to_string()]);
        assert_eq!(assessment.risk_colour, Some(RiskColour::Red));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            RiskAssessment::from_value(&json!(["not", "an", "object"])),
            Err(DashboardError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_colour_from_score() {
        assert_eq!(RiskColour::from_score(1), RiskColour::Red);
        assert_eq!(RiskColour::from_score(50), RiskColour::Amber);
        assert_eq!(RiskColour::from_score(100), RiskColour::Green);
        assert_eq!("Green".parse::<RiskColour>().unwrap(), RiskColour::Green);
    }
}
