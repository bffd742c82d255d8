//! LLM risk assessment endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use super::error::{parse_asset, ApiError};
use crate::panels::{risk_panel, Panel, RiskData};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/risk/{symbol}", get(get_risk))
}

/// Responds 503 when no LLM credential is configured
async fn get_risk(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Panel<RiskData>>, ApiError> {
    let asset = parse_asset(&symbol)?;
    info!("Risk panel requested for {}", asset);

    let assessment = state.dashboard.risk_assessment(asset).await?;
    Ok(Json(risk_panel(asset, assessment)))
}
