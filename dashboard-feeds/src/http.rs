//! Shared HTTP plumbing for the REST clients

use dashboard_core::{DashboardError, DashboardResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Build a reqwest client with a timeout and user agent
pub(crate) fn build_client(timeout: Duration, user_agent: &str) -> DashboardResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| DashboardError::internal(format!("Failed to create HTTP client: {}", e)))
}

/// Send a request and decode the body as untyped JSON
///
/// Transport errors and non-success statuses are `UpstreamUnavailable`; an
/// undecodable body is `MalformedPayload`. Typed validation happens in the
/// caller's parse step.
pub(crate) async fn fetch_json(request: RequestBuilder, source_name: &str) -> DashboardResult<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| DashboardError::upstream(source_name, format!("request failed: {}", e)))?;

    let status = response.status();
    debug!("[{}] HTTP {}", source_name, status);

    if status == StatusCode::ACCEPTED {
        // GitHub answers 202 while it computes repository statistics
        return Err(DashboardError::upstream(
            source_name,
            "data is still being computed, retry shortly",
        ));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DashboardError::upstream(
            source_name,
            format!("HTTP {}: {}", status, truncate(&body, 200)),
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| DashboardError::malformed(format!("{} returned invalid JSON: {}", source_name, e)))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
