//! Client configuration
//!
//! Sourced once at process start and handed to each client's constructor.

use dashboard_core::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "CryptoDashboard/1.0";
pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";

/// Credentials and model selection for the LLM risk assessment
#[derive(Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    pub api_key: String,
    #[serde(default = "default_groq_model")]
    pub model: String,
    #[serde(default = "default_groq_api_base")]
    pub api_base: String,
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GroqConfig {
    /// Load from `GROQ_API_KEY`, `GROQ_MODEL` and `GROQ_API_BASE`
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DashboardError::missing_credential("GROQ_API_KEY"))?;

        Ok(Self {
            api_key,
            model: lookup("GROQ_MODEL").unwrap_or_else(default_groq_model),
            api_base: lookup("GROQ_API_BASE").unwrap_or_else(default_groq_api_base),
        })
    }
}

/// Settings shared by the unauthenticated HTTP clients
#[derive(Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// Sent on every request; Reddit and GitHub reject anonymous agents
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Optional token raising GitHub's anonymous rate limit
    #[serde(default)]
    pub github_token: Option<String>,
}

impl std::fmt::Debug for FeedsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedsConfig")
            .field("user_agent", &self.user_agent)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            github_token: None,
        }
    }
}

impl FeedsConfig {
    /// Load from `REDDIT_USER_AGENT` and `GITHUB_TOKEN`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            user_agent: lookup("REDDIT_USER_AGENT").unwrap_or_else(default_user_agent),
            github_token: lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.to_string()
}

fn default_groq_api_base() -> String {
    DEFAULT_GROQ_API_BASE.to_string()
}
