//! Error types for the dashboard

use thiserror::Error;

/// Dashboard-wide error type
///
/// `Clone` so a single in-flight fetch can hand the same failure to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// Transport or HTTP failure from an upstream API
    #[error("Upstream unavailable ({source_name}): {message}")]
    UpstreamUnavailable { source_name: String, message: String },

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Fewer samples than a derivation requires
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    pub fn upstream(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        DashboardError::UpstreamUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn unknown_symbol(symbol: impl Into<String>) -> Self {
        DashboardError::UnknownSymbol(symbol.into())
    }

    pub fn insufficient(msg: impl Into<String>) -> Self {
        DashboardError::InsufficientData(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        DashboardError::MalformedPayload(msg.into())
    }

    pub fn division_by_zero(msg: impl Into<String>) -> Self {
        DashboardError::DivisionByZero(msg.into())
    }

    pub fn missing_credential(name: impl Into<String>) -> Self {
        DashboardError::MissingCredential(name.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        DashboardError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DashboardError::Internal(msg.into())
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_names_source() {
        let err = DashboardError::upstream("GitHub", "HTTP 500");
        assert_eq!(err.to_string(), "Upstream unavailable (GitHub): HTTP 500");
    }

    #[test]
    fn test_errors_are_comparable() {
        assert_eq!(
            DashboardError::unknown_symbol("DOGE"),
            DashboardError::UnknownSymbol("DOGE".to_string())
        );
    }
}
