//! GitHub repository metrics client

use async_trait::async_trait;
use chrono::DateTime;
use dashboard_core::{
    Asset, DashboardError, DashboardResult, RepoDescriptor, RepoMetrics, WeeklyCommits,
};
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::FeedsConfig;
use crate::http::{build_client, fetch_json};
use crate::source::RepositorySource;

const GITHUB_API_BASE: &str = "https://api.github.com";
const SOURCE_NAME: &str = "GitHub";

/// GitHub REST API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

/// Subset of `/repos/{owner}/{repo}` the dashboard uses
#[derive(Debug, Deserialize)]
struct RepoResponse {
    subscribers_count: u64,
    open_issues_count: u64,
    stargazers_count: u64,
    size: u64,
}

/// One entry of `/stats/commit_activity`
#[derive(Debug, Deserialize)]
struct CommitActivityWeek {
    total: u64,
    week: i64,
}

impl GitHubClient {
    pub fn new(config: &FeedsConfig) -> DashboardResult<Self> {
        Ok(Self {
            http: build_client(Duration::from_secs(30), &config.user_agent)?,
            base_url: GITHUB_API_BASE.to_string(),
            token: config.github_token.clone(),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json");

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch repository counters and the last year of weekly commit totals
    #[instrument(skip(self))]
    pub async fn get_github_metrics(&self, asset: Asset) -> DashboardResult<RepoMetrics> {
        let repo = asset.repository();

        let repo_url = format!("{}/repos/{}", self.base_url, repo);
        debug!("[GitHub] Fetching repository from: {}", repo_url);
        let repo_raw = fetch_json(self.get(&repo_url), SOURCE_NAME).await?;

        let commits_url = format!("{}/repos/{}/stats/commit_activity", self.base_url, repo);
        debug!("[GitHub] Fetching commit activity from: {}", commits_url);
        let commits_raw = fetch_json(self.get(&commits_url), SOURCE_NAME).await?;

        let metrics = parse_repo_metrics(repo, repo_raw, commits_raw)?;
        info!(
            "[GitHub] Fetched {} weeks of commit activity for {}",
            metrics.commit_activity.len(),
            repo
        );

        Ok(metrics)
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn repository_metrics(&self, asset: Asset) -> DashboardResult<RepoMetrics> {
        self.get_github_metrics(asset).await
    }
}

/// Validate the repository and commit-activity documents
pub fn parse_repo_metrics(
    repository: &str,
    repo_raw: Value,
    commits_raw: Value,
) -> DashboardResult<RepoMetrics> {
    let repo: RepoResponse = serde_json::from_value(repo_raw)
        .map_err(|e| DashboardError::malformed(format!("GitHub repository: {}", e)))?;

    let weeks: Vec<CommitActivityWeek> = serde_json::from_value(commits_raw)
        .map_err(|e| DashboardError::malformed(format!("GitHub commit activity: {}", e)))?;

    let commit_activity = weeks
        .into_iter()
        .map(|week| {
            let week_start = DateTime::from_timestamp(week.week, 0).ok_or_else(|| {
                DashboardError::malformed(format!("invalid week timestamp: {}", week.week))
            })?;
            Ok(WeeklyCommits {
                week_start,
                total: week.total,
            })
        })
        .collect::<DashboardResult<Vec<_>>>()?;

    Ok(RepoMetrics {
        repository: repository.to_string(),
        descriptor: RepoDescriptor {
            subscribers_count: repo.subscribers_count,
            open_issues_count: repo.open_issues_count,
            stargazers_count: repo.stargazers_count,
            size: repo.size,
            closed_issues: None,
            previous_subscribers: None,
        },
        commit_activity,
    })
}
