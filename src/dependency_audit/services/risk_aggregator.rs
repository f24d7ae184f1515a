use crate::dependency_audit::domain::{
    Dependency, DependencyFinding, RepoRiskSummary, Scope, Severity, VulnerabilityRecord,
};

/// RiskAggregator service for severity-weighted risk scoring
///
/// Pure computation over domain objects: the same findings always produce
/// the same score regardless of their order.
pub struct RiskAggregator;

impl RiskAggregator {
    /// Bonus applied to dependencies shipped at runtime
    const RUNTIME_BONUS: u32 = 1;

    /// Scores a single dependency
    ///
    /// # Returns
    /// 0 when there are no vulnerabilities, otherwise the highest severity
    /// weight plus one for runtime dependencies
    pub fn dependency_risk(dependency: &Dependency, vulnerabilities: &[VulnerabilityRecord]) -> u32 {
        let Some(max_weight) = vulnerabilities.iter().map(|v| v.severity.weight()).max() else {
            return 0;
        };

        if dependency.scope() == Scope::Runtime {
            max_weight + Self::RUNTIME_BONUS
        } else {
            max_weight
        }
    }

    /// Rolls findings up into a repository summary
    ///
    /// The highest severity is LOW when nothing ranks above it, including
    /// repositories with no vulnerabilities or only UNKNOWN ones.
    pub fn repo_risk(findings: &[DependencyFinding]) -> RepoRiskSummary {
        let risk_score = findings.iter().map(|f| f.risk_score()).sum();
        let vulnerable_dependency_count = findings.iter().filter(|f| f.is_vulnerable()).count();
        let highest_severity = findings
            .iter()
            .flat_map(|f| f.vulnerabilities().iter().map(|v| v.severity))
            .fold(Severity::Low, |highest, severity| {
                if severity.rank() > highest.rank() {
                    severity
                } else {
                    highest
                }
            });

        RepoRiskSummary {
            risk_score,
            highest_severity,
            vulnerable_dependency_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_audit::domain::Ecosystem;

    fn dep(name: &str, scope: Scope) -> Dependency {
        Dependency::new(Ecosystem::Npm, name, "1.0.0", scope, "package.json").unwrap()
    }

    fn vuln(severity: Severity) -> VulnerabilityRecord {
        VulnerabilityRecord {
            id: format!("OSV-{}", severity),
            summary: String::new(),
            severity,
            cvss_score: None,
            affected_range: String::new(),
            fixed_versions: vec![],
            reference_url: String::new(),
        }
    }

    #[test]
    fn test_no_vulnerabilities_scores_zero() {
        assert_eq!(RiskAggregator::dependency_risk(&dep("a", Scope::Runtime), &[]), 0);
    }

    #[test]
    fn test_runtime_high_scores_five() {
        let score = RiskAggregator::dependency_risk(&dep("a", Scope::Runtime), &[vuln(Severity::High)]);
        assert_eq!(score, 5);
    }

    #[test]
    fn test_dev_high_scores_four() {
        let score = RiskAggregator::dependency_risk(&dep("a", Scope::Dev), &[vuln(Severity::High)]);
        assert_eq!(score, 4);
    }

    #[test]
    fn test_max_weight_is_used() {
        let vulns = [vuln(Severity::Low), vuln(Severity::Critical), vuln(Severity::Medium)];
        assert_eq!(RiskAggregator::dependency_risk(&dep("a", Scope::Test), &vulns), 5);
    }

    #[test]
    fn test_repo_risk_sums_and_counts() {
        let findings = vec![
            DependencyFinding::new(dep("a", Scope::Runtime), vec![vuln(Severity::Critical)]),
            DependencyFinding::new(dep("b", Scope::Dev), vec![vuln(Severity::Medium)]),
            DependencyFinding::new(dep("c", Scope::Runtime), vec![]),
        ];
        let summary = RiskAggregator::repo_risk(&findings);
        assert_eq!(summary.risk_score, 9);
        assert_eq!(summary.vulnerable_dependency_count, 2);
        assert_eq!(summary.highest_severity, Severity::Critical);
    }

    #[test]
    fn test_repo_risk_prefers_low_over_unknown_in_any_order() {
        let forward = vec![
            DependencyFinding::new(dep("a", Scope::Dev), vec![vuln(Severity::Unknown)]),
            DependencyFinding::new(dep("b", Scope::Dev), vec![vuln(Severity::Low)]),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(RiskAggregator::repo_risk(&forward).highest_severity, Severity::Low);
        assert_eq!(RiskAggregator::repo_risk(&backward).highest_severity, Severity::Low);
    }

    #[test]
    fn test_repo_risk_unknown_only_reports_low() {
        let findings = vec![
            DependencyFinding::new(dep("a", Scope::Runtime), vec![]),
            DependencyFinding::new(dep("b", Scope::Runtime), vec![vuln(Severity::Unknown)]),
        ];
        let summary = RiskAggregator::repo_risk(&findings);
        assert_eq!(summary.risk_score, 2);
        assert_eq!(summary.vulnerable_dependency_count, 1);
        assert_eq!(summary.highest_severity, Severity::Low);
    }

    #[test]
    fn test_repo_risk_empty() {
        let summary = RiskAggregator::repo_risk(&[]);
        assert_eq!(summary.risk_score, 0);
        assert_eq!(summary.vulnerable_dependency_count, 0);
        assert_eq!(summary.highest_severity, Severity::Low);
    }
}
