//! Social sentiment endpoint

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use dashboard_core::SentimentSummary;

use super::error::{parse_asset, ApiError, TimeframeQuery};
use crate::panels::{sentiment_panel, Panel};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/sentiment/{symbol}", get(get_sentiment))
}

async fn get_sentiment(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<Panel<SentimentSummary>>, ApiError> {
    let asset = parse_asset(&symbol)?;
    let timeframe = query.timeframe()?;
    info!("Sentiment panel requested for {} ({})", asset, timeframe);

    let summary = state.dashboard.sentiment_summary(asset, timeframe).await?;
    Ok(Json(sentiment_panel(asset, summary)))
}
