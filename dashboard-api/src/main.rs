//! Crypto Analysis Dashboard API Server
//!
//! Serves the market, sentiment, technical-fundamentals and risk panels for
//! the supported assets, built from CoinGecko, Reddit, GitHub and Groq.

mod config;
mod panels;
mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dashboard_feeds::{
    CoinGeckoClient, GitHubClient, GroqClient, RedditClient, RiskAssessmentSource,
};
use dashboard_services::{DashboardService, DashboardSources};

use crate::config::AppConfig;

/// How often expired cache entries are swept
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dashboard_api=debug")),
        )
        .init();

    info!("Starting Crypto Analysis Dashboard API");

    let config = AppConfig::from_env()?;
    info!("Cache TTLs: {:?}", config.cache);

    let risk: Option<Arc<dyn RiskAssessmentSource>> = match &config.groq {
        Some(groq) => {
            info!("Groq credentials found - risk panel enabled (model {})", groq.model);
            Some(Arc::new(GroqClient::new(groq)))
        }
        None => {
            info!("No GROQ_API_KEY found - risk panel will be unavailable");
            None
        }
    };

    if config.feeds.github_token.is_none() {
        info!("No GITHUB_TOKEN found - using the anonymous GitHub rate limit");
    }

    let sources = DashboardSources {
        market: Arc::new(CoinGeckoClient::new(&config.feeds)?),
        social: Arc::new(RedditClient::new(&config.feeds)?),
        repository: Arc::new(GitHubClient::new(&config.feeds)?),
        risk,
    };
    let dashboard = Arc::new(DashboardService::new(sources, config.cache));

    // Sweep expired cache entries in background
    let dashboard_for_purge = Arc::clone(&dashboard);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = dashboard_for_purge.purge_expired();
            if purged > 0 {
                tracing::debug!("Purged {} expired cache entries", purged);
            }
        }
    });

    let state = AppState { dashboard };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
