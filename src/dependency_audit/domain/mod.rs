pub mod dependency;
pub mod finding;
pub mod report;
pub mod vulnerability;

pub use dependency::{Dependency, DependencyKey, Ecosystem, Scope, ANY_VERSION};
pub use finding::{DependencyFinding, RepoRiskSummary};
pub use report::{RepoReport, ScanReport, ScanSummary};
pub use vulnerability::{Severity, VulnerabilityRecord};
