//! Technical fundamentals (developer activity) endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use dashboard_core::GithubSummary;

use super::error::{parse_asset, ApiError};
use crate::panels::{fundamentals_panel, Panel};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/fundamentals/{symbol}", get(get_fundamentals))
}

async fn get_fundamentals(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Panel<GithubSummary>>, ApiError> {
    let asset = parse_asset(&symbol)?;
    info!("Fundamentals panel requested for {}", asset);

    let summary = state.dashboard.github_summary(asset).await?;
    Ok(Json(fundamentals_panel(asset, summary)))
}
