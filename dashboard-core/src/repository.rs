//! Code-hosting (developer activity) structures

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Repository counters used by the technical fundamentals view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    /// Watchers (the API's `subscribers_count`)
    pub subscribers_count: u64,
    pub open_issues_count: u64,
    pub stargazers_count: u64,
    /// Repository size in KB
    pub size: u64,
    /// Not reported by the hosting API; absent unless supplied elsewhere
    #[serde(default)]
    pub closed_issues: Option<u64>,
    /// Subscriber count from an earlier snapshot, when known
    #[serde(default)]
    pub previous_subscribers: Option<u64>,
}

/// Commit total for one week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCommits {
    pub week_start: DateTime<Utc>,
    pub total: u64,
}

/// Validated repository payload: descriptor plus weekly commit activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoMetrics {
    pub repository: String,
    pub descriptor: RepoDescriptor,
    /// Oldest week first
    pub commit_activity: Vec<WeeklyCommits>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPoint {
    pub date: NaiveDate,
    pub commits: u64,
}

/// One bucket of the estimated contributor split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperBucket {
    pub category: String,
    pub estimated_count: f64,
}

/// Heuristic repository health scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepoHealth {
    pub code_quality: f64,
    pub documentation: f64,
    pub community_activity: f64,
    /// Grows with open issues relative to closed ones (formula kept as shipped)
    pub issue_resolution: f64,
}

impl RepoHealth {
    /// Labelled scores in display order
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("Code Quality", self.code_quality),
            ("Documentation", self.documentation),
            ("Community Activity", self.community_activity),
            ("Issue Resolution", self.issue_resolution),
        ]
    }
}

/// Display-ready developer activity metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubSummary {
    /// Subscriber count standing in for a distinct-committer count
    pub estimated_active_developers: u64,
    pub developer_change: f64,
    pub total_commits: u64,
    /// Last 4 weeks against the 4 weeks before
    pub commit_change: f64,
    pub open_issues: u64,
    /// Open minus closed issues (closed defaults to 0), not a net change over time
    pub issues_delta: i64,
    pub commit_history: Vec<CommitPoint>,
    /// Fixed 10/30/60 split of subscribers, not measured contributor data
    pub estimated_developer_distribution: Vec<DeveloperBucket>,
    pub repo_health: RepoHealth,
}
