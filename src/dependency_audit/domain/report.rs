use super::finding::{DependencyFinding, RepoRiskSummary};
use super::vulnerability::Severity;
use crate::dependency_audit::services::RiskAggregator;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum number of repositories listed in `ScanSummary::top_risks`
const TOP_RISKS_LIMIT: usize = 5;

/// Audit result for one repository, as handed to presentation and export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoReport {
    pub repository: String,
    /// Web page of a hosted repository
    pub html_url: Option<String>,
    /// Last push reported by the host
    pub pushed_at: Option<DateTime<Utc>>,
    pub dependencies: Vec<DependencyFinding>,
    #[serde(flatten)]
    pub summary: RepoRiskSummary,
}

impl RepoReport {
    /// Builds the report; the summary is always derived from `dependencies`.
    pub fn build(repository: impl Into<String>, dependencies: Vec<DependencyFinding>) -> Self {
        let summary = RiskAggregator::repo_risk(&dependencies);
        Self {
            repository: repository.into(),
            html_url: None,
            pushed_at: None,
            dependencies,
            summary,
        }
    }

    /// Attaches the host metadata of the audited repository
    pub fn with_source(mut self, html_url: Option<String>, pushed_at: Option<DateTime<Utc>>) -> Self {
        self.html_url = html_url;
        self.pushed_at = pushed_at;
        self
    }

    pub fn is_vulnerable(&self) -> bool {
        self.summary.vulnerable_dependency_count > 0
    }
}

/// Owner- or directory-level roll-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_repositories: usize,
    pub vulnerable_repositories: usize,
    /// Names of the riskiest repositories, highest score first
    pub top_risks: Vec<String>,
}

/// Full output of one scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<RepoReport>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn new(target: impl Into<String>, repositories: Vec<RepoReport>) -> Self {
        let vulnerable_repositories = repositories
            .iter()
            .filter(|r| r.is_vulnerable())
            .count();

        let mut ranked: Vec<&RepoReport> = repositories
            .iter()
            .filter(|r| r.summary.risk_score > 0)
            .collect();
        // stable: equal scores keep scan order
        ranked.sort_by(|a, b| b.summary.risk_score.cmp(&a.summary.risk_score));
        let top_risks = ranked
            .into_iter()
            .take(TOP_RISKS_LIMIT)
            .map(|r| r.repository.clone())
            .collect();

        Self {
            target: target.into(),
            generated_at: Utc::now(),
            summary: ScanSummary {
                total_repositories: repositories.len(),
                vulnerable_repositories,
                top_risks,
            },
            repositories,
        }
    }

    /// Highest severity across every repository in the scan, LOW at minimum
    pub fn highest_severity(&self) -> Severity {
        self.repositories
            .iter()
            .map(|r| r.summary.highest_severity)
            .fold(Severity::Low, |highest, severity| {
                if severity.rank() > highest.rank() {
                    severity
                } else {
                    highest
                }
            })
    }

    pub fn has_vulnerabilities(&self) -> bool {
        self.summary.vulnerable_repositories > 0
    }
}
