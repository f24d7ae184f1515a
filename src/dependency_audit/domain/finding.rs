use super::dependency::Dependency;
use super::vulnerability::{Severity, VulnerabilityRecord};
use crate::dependency_audit::policies::recommend_upgrades;
use crate::dependency_audit::services::RiskAggregator;
use serde::Serialize;

/// A dependency joined with the advisories that affect it
///
/// The score and upgrade recommendations are derived once in [`DependencyFinding::new`]
/// and cannot drift from the vulnerabilities afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyFinding {
    dependency: Dependency,
    vulnerabilities: Vec<VulnerabilityRecord>,
    risk_score: u32,
    recommended_upgrades: Vec<String>,
}

impl DependencyFinding {
    pub fn new(dependency: Dependency, vulnerabilities: Vec<VulnerabilityRecord>) -> Self {
        let risk_score = RiskAggregator::dependency_risk(&dependency, &vulnerabilities);
        let recommended_upgrades = recommend_upgrades(dependency.version(), &vulnerabilities);
        Self {
            dependency,
            vulnerabilities,
            risk_score,
            recommended_upgrades,
        }
    }

    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    pub fn vulnerabilities(&self) -> &[VulnerabilityRecord] {
        &self.vulnerabilities
    }

    pub fn risk_score(&self) -> u32 {
        self.risk_score
    }

    /// Up to two fixed versions newer than the declared one
    pub fn recommended_upgrades(&self) -> &[String] {
        &self.recommended_upgrades
    }

    pub fn is_vulnerable(&self) -> bool {
        !self.vulnerabilities.is_empty()
    }
}

/// Repository-level risk rolled up from its findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepoRiskSummary {
    pub risk_score: u32,
    /// Starts at LOW and only moves to a strictly higher rank
    pub highest_severity: Severity,
    pub vulnerable_dependency_count: usize,
}
