//! depaudit - dependency auditor for source repositories
//!
//! This library extracts the dependencies declared in repository manifests,
//! correlates them with OSV advisories and scores repository risk, following
//! hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_audit`): Manifest parsers, risk scoring and domain models
//! - **Application Layer** (`application`): Use cases and the vulnerability correlator
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use depaudit::prelude::*;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters
//! let source = LocalRepositorySource::new(PathBuf::from("."))?;
//! let transport = OsvHttpTransport::new(OsvHttpTransport::DEFAULT_API_URL, Duration::from_secs(30))?;
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = AuditUseCase::new(
//!     source,
//!     VulnerabilityCorrelator::new(transport),
//!     progress_reporter,
//! );
//!
//! // Execute
//! let request = AuditRequest::new(".", AuditRequest::default_directories());
//! let report = use_case.execute(request).await?;
//!
//! // Present output
//! StdoutPresenter::new().present(&serde_json::to_string_pretty(&report)?)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod dependency_audit;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemWriter, LocalRepositorySource, StdoutPresenter,
    };
    pub use crate::adapters::outbound::network::{GitHubRepositorySource, OsvHttpTransport};
    pub use crate::application::dto::AuditRequest;
    pub use crate::application::use_cases::{AuditUseCase, RetryPolicy, VulnerabilityCorrelator};
    pub use crate::dependency_audit::domain::{
        Dependency, DependencyFinding, Ecosystem, RepoReport, ScanReport, Scope, Severity,
        VulnerabilityRecord,
    };
    pub use crate::dependency_audit::parsers::ManifestParserRegistry;
    pub use crate::dependency_audit::policies::normalize_version;
    pub use crate::dependency_audit::services::RiskAggregator;
    pub use crate::ports::outbound::{
        AdvisoryTransport, OutputPresenter, ProgressReporter, RepositoryMeta, RepositorySource,
    };
    pub use crate::shared::Result;
}
