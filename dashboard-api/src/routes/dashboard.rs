//! Combined dashboard endpoint
//!
//! Renders every panel for a symbol. A failing panel is reported in place
//! and does not affect the others.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use dashboard_core::{
    Asset, DashboardResult, GithubSummary, MarketSummary, SentimentSummary, Timeframe,
};

use super::error::{parse_asset, ApiError, TimeframeQuery};
use crate::panels::{
    fundamentals_panel, market_panel, risk_panel, sentiment_panel, Panel, RiskData,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/{symbol}", get(get_dashboard))
}

/// A rendered panel or the message shown in its place
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PanelOutcome<T> {
    Ok(Panel<T>),
    Error { message: String },
}

impl<T> PanelOutcome<T> {
    fn from_result<S>(
        what: &str,
        result: DashboardResult<S>,
        render: impl FnOnce(S) -> Panel<T>,
    ) -> Self {
        match result {
            Ok(value) => PanelOutcome::Ok(render(value)),
            Err(e) => {
                warn!("{} panel failed: {}", what, e);
                PanelOutcome::Error {
                    message: format!("Error fetching {} data: {}", what, e),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub title: &'static str,
    pub symbol: Asset,
    pub timeframe: Timeframe,
    pub market: PanelOutcome<MarketSummary>,
    pub sentiment: PanelOutcome<SentimentSummary>,
    pub fundamentals: PanelOutcome<GithubSummary>,
    pub risk: PanelOutcome<RiskData>,
}

async fn get_dashboard(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let asset = parse_asset(&symbol)?;
    let timeframe = query.timeframe()?;
    info!("Dashboard requested for {} ({})", asset, timeframe);

    let dashboard = &state.dashboard;

    let market = PanelOutcome::from_result(
        "market",
        dashboard.market_summary(asset, timeframe).await,
        |s| market_panel(asset, s),
    );
    let sentiment = PanelOutcome::from_result(
        "sentiment",
        dashboard.sentiment_summary(asset, timeframe).await,
        |s| sentiment_panel(asset, s),
    );
    let fundamentals = PanelOutcome::from_result(
        "GitHub",
        dashboard.github_summary(asset).await,
        |s| fundamentals_panel(asset, s),
    );
    let risk = PanelOutcome::from_result(
        "risk",
        dashboard.risk_assessment(asset).await,
        |s| risk_panel(asset, s),
    );

    Ok(Json(DashboardResponse {
        title: "Cryptocurrency Analysis Dashboard",
        symbol: asset,
        timeframe,
        market,
        sentiment,
        fundamentals,
        risk,
    }))
}
