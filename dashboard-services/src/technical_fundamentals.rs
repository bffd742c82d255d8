//! Developer activity transform
//!
//! Several of these figures are proxies: subscribers stand in for active
//! developers and the contributor split is a fixed ratio, not measured data.

use dashboard_core::{CommitPoint, DeveloperBucket, GithubSummary, RepoHealth, RepoMetrics};

/// Weeks in each window of the commit comparison
pub const COMMIT_WINDOW_WEEKS: usize = 4;

const DEVELOPER_SPLIT: [(&str, f64); 3] = [
    ("Active Contributors", 0.1),
    ("Regular Contributors", 0.3),
    ("Occasional Contributors", 0.6),
];

/// Build the developer activity summary for a repository
///
/// Short commit histories degrade rather than fail: missing weeks count as
/// zero commits.
pub fn process_github_data(metrics: &RepoMetrics) -> GithubSummary {
    let repo = &metrics.descriptor;
    let weekly: Vec<u64> = metrics.commit_activity.iter().map(|w| w.total).collect();

    let developer_change = match repo.previous_subscribers {
        Some(previous) => {
            (repo.subscribers_count as f64 - previous as f64) / previous.max(1) as f64 * 100.0
        }
        None => repo.subscribers_count as f64 * 100.0,
    };

    let (recent, prior) = commit_windows(&weekly);
    let commit_change = (recent as f64 - prior as f64) / prior.max(1) as f64 * 100.0;

    let closed = repo.closed_issues.unwrap_or(0);
    let issues_delta = to_i64(repo.open_issues_count).saturating_sub(to_i64(closed));

    let commit_history = metrics
        .commit_activity
        .iter()
        .map(|w| CommitPoint {
            date: w.week_start.date_naive(),
            commits: w.total,
        })
        .collect();

    let estimated_developer_distribution = DEVELOPER_SPLIT
        .iter()
        .map(|(category, share)| DeveloperBucket {
            category: category.to_string(),
            estimated_count: repo.subscribers_count as f64 * share,
        })
        .collect();

    GithubSummary {
        estimated_active_developers: repo.subscribers_count,
        developer_change,
        total_commits: weekly.iter().sum(),
        commit_change,
        open_issues: repo.open_issues_count,
        issues_delta,
        commit_history,
        estimated_developer_distribution,
        repo_health: repo_health(metrics),
    }
}

/// Commit totals of the last four weeks and of the four weeks before them
fn commit_windows(weekly: &[u64]) -> (u64, u64) {
    let split = weekly.len().saturating_sub(COMMIT_WINDOW_WEEKS);
    let recent = weekly[split..].iter().sum();
    let prior = weekly[split.saturating_sub(COMMIT_WINDOW_WEEKS)..split]
        .iter()
        .sum();
    (recent, prior)
}

/// Heuristic health scores, each clamped to [0, 100]
pub fn repo_health(metrics: &RepoMetrics) -> RepoHealth {
    let repo = &metrics.descriptor;
    // closed issues default to 1 here but to 0 for issues_delta
    let closed = repo.closed_issues.unwrap_or(1);

    RepoHealth {
        code_quality: clamp_score(repo.stargazers_count as f64 / 1000.0 * 10.0),
        documentation: clamp_score(repo.size as f64 / 1000.0 * 5.0),
        community_activity: clamp_score(repo.subscribers_count as f64 / 100.0 * 10.0),
        issue_resolution: clamp_score(
            repo.open_issues_count as f64 / (closed as f64 + 1.0) * 100.0,
        ),
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
