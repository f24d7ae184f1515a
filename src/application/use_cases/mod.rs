/// Use cases module containing application business logic orchestration
mod audit_repositories;
mod correlate_vulnerabilities;

pub use audit_repositories::AuditUseCase;
pub use correlate_vulnerabilities::{
    AdvisoryCache, RetryPolicy, VulnerabilityCorrelator, DEFAULT_CONCURRENCY,
};
