//! Market metrics endpoint

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use dashboard_core::MarketSummary;

use super::error::{parse_asset, ApiError, TimeframeQuery};
use crate::panels::{market_panel, Panel};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/market/{symbol}", get(get_market))
}

async fn get_market(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<Panel<MarketSummary>>, ApiError> {
    let asset = parse_asset(&symbol)?;
    let timeframe = query.timeframe()?;
    info!("Market panel requested for {} ({})", asset, timeframe);

    let summary = state.dashboard.market_summary(asset, timeframe).await?;
    Ok(Json(market_panel(asset, summary)))
}
