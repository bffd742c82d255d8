//! Error responses shared by the panel routes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use dashboard_core::{Asset, DashboardError, Timeframe};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("Invalid query: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Dashboard(e) => match e {
                DashboardError::UnknownSymbol(_) => StatusCode::NOT_FOUND,
                DashboardError::InsufficientData(_)
                | DashboardError::MalformedPayload(_)
                | DashboardError::DivisionByZero(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DashboardError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
                DashboardError::MissingCredential(_) => StatusCode::SERVICE_UNAVAILABLE,
                DashboardError::Config(_) | DashboardError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Query parameters for timeframe-scoped panels
#[derive(Debug, Default, Deserialize)]
pub struct TimeframeQuery {
    pub timeframe: Option<String>,
}

impl TimeframeQuery {
    /// Requested timeframe, 7 days when absent
    pub fn timeframe(&self) -> Result<Timeframe, ApiError> {
        match &self.timeframe {
            None => Ok(Timeframe::default()),
            Some(raw) => raw
                .parse()
                .map_err(|e: DashboardError| ApiError::BadRequest(e.to_string())),
        }
    }
}

pub fn parse_asset(symbol: &str) -> Result<Asset, ApiError> {
    Ok(symbol.parse::<Asset>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DashboardError::unknown_symbol("DOGE"), StatusCode::NOT_FOUND),
            (DashboardError::insufficient("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (DashboardError::malformed("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (DashboardError::division_by_zero("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (DashboardError::upstream("CoinGecko", "x"), StatusCode::BAD_GATEWAY),
            (DashboardError::missing_credential("GROQ_API_KEY"), StatusCode::SERVICE_UNAVAILABLE),
            (DashboardError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
        assert_eq!(
            ApiError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_timeframe_query() {
        assert_eq!(
            TimeframeQuery::default().timeframe().unwrap(),
            Timeframe::SevenDays
        );

        let query = TimeframeQuery {
            timeframe: Some("30d".to_string()),
        };
        assert_eq!(query.timeframe().unwrap(), Timeframe::ThirtyDays);

        let bad = TimeframeQuery {
            timeframe: Some("5y".to_string()),
        };
        assert!(matches!(bad.timeframe(), Err(ApiError::BadRequest(_))));
    }
}
