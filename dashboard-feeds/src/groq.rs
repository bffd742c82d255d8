//! Groq chat-completion client for LLM risk assessments
//!
//! Groq serves an OpenAI-compatible API, so the OpenAI client is pointed at
//! Groq's base URL with a Groq key.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use dashboard_core::{Asset, DashboardError, DashboardResult, RiskAssessment};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::GroqConfig;
use crate::source::RiskAssessmentSource;

const SOURCE_NAME: &str = "Groq";

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.clone())
            .with_api_base(config.api_base.clone());

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
        }
    }

    /// Single-message completion request in JSON mode
    fn chat_request(&self, prompt: &str) -> DashboardResult<CreateChatCompletionRequest> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| DashboardError::internal(e.to_string()))?
                .into()])
            .temperature(0.2)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| DashboardError::internal(e.to_string()))
    }

    /// Send a prompt and decode the JSON object in the reply
    #[instrument(skip(self, prompt))]
    pub async fn request(&self, prompt: &str) -> DashboardResult<Value> {
        let request = self.chat_request(prompt)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| DashboardError::upstream(SOURCE_NAME, e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| DashboardError::malformed("No response content from Groq"))?;

        debug!("[Groq] Completion of {} chars", content.len());

        let json_str = extract_json(content)?;
        serde_json::from_str(&json_str)
            .map_err(|e| DashboardError::malformed(format!("Groq reply is not valid JSON: {}", e)))
    }

    /// Ask the model for a structured risk assessment of an asset
    #[instrument(skip(self))]
    pub async fn assess_risk(&self, asset: Asset) -> DashboardResult<RiskAssessment> {
        let raw = self.request(&risk_prompt(asset)).await?;
        let assessment = RiskAssessment::from_value(&raw)?;

        info!(
            "[Groq] Risk assessment for {}: score {:?}, colour {:?}",
            asset, assessment.promise_risk_score, assessment.risk_colour
        );

        Ok(assessment)
    }
}

#[async_trait]
impl RiskAssessmentSource for GroqClient {
    async fn risk_assessment(&self, asset: Asset) -> DashboardResult<RiskAssessment> {
        self.assess_risk(asset).await
    }
}

/// Prompt requesting the risk metrics in a fixed JSON layout
pub fn risk_prompt(asset: Asset) -> String {
    format!(
        r#"Search input for coin: {symbol}
We would like to assess the invest-ability risk of {symbol} and whether it is worth considering an investment in the coin.
There will be an overall score of promise / risk from 1-100 and a colour for it - red, amber, green - to flag the coin.
Please give me the following metrics for the coin above:
- ticker of the coin
- when was the coin founded
- market size
- current price
- are there any other metrics I should consider that will help flag risk
Supply metrics:
- market supply of coin
- max supply
- market cap
- 24 hour volume
- think about whether this is helpful for risk.
- what are the strengths of the coin
Community metrics score:
- security score
- liquidity score
- volatility score
Please return only a JSON object that follows the structure of this example:
{{"coin": "ETH",
  "ticker": "ETH",
  "founded": "2014-07-30T00:00:00.000Z",
  "market_size": 24022038474.1443,
  "current_price": 3957.7603,
  "metrics_to_consider": ["Burn Rate", "Miner Distribution", "Open Source Development"],
  "market_supply": 1122334521345.0,
  "max_supply": 124333453545.0,
  "market_cap": 454543345334.0,
  "24_hour_volume": 125445454534.0,
  "risk_flags": ["Burn Rate", "Miner Distribution"],
  "key_strengths": ["Strong security track record", "Active developer community"],
  "security_score": 60,
  "liquidity_score": 80,
  "volatility_score": 90,
  "promise_risk_score": 85,
  "risk_colour": "amber"}}"#,
        symbol = asset.symbol()
    )
}

/// Pull the JSON object out of a completion (plain or inside a code fence)
pub fn extract_json(content: &str) -> DashboardResult<String> {
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            if end > start {
                return Ok(content[start..=end].to_string());
            }
        }
    }

    Err(DashboardError::malformed("No JSON object found in Groq reply"))
}
