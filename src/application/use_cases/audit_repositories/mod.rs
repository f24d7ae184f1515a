use super::correlate_vulnerabilities::VulnerabilityCorrelator;
use crate::application::dto::AuditRequest;
use crate::dependency_audit::domain::{Dependency, DependencyFinding, RepoReport, ScanReport};
use crate::dependency_audit::parsers::ManifestParserRegistry;
use crate::ports::outbound::{
    AdvisoryTransport, ProgressReporter, RepositoryMeta, RepositorySource,
};
use crate::shared::Result;

/// AuditUseCase - Core use case for auditing repositories
///
/// Repositories are processed one after another: list candidate files,
/// parse the manifests among them, correlate the dependencies with
/// advisories and score the result. Any error aborts the whole scan.
///
/// # Type Parameters
/// * `S` - RepositorySource implementation
/// * `T` - AdvisoryTransport implementation used by the correlator
/// * `P` - ProgressReporter implementation
pub struct AuditUseCase<S, T: AdvisoryTransport, P> {
    repository_source: S,
    correlator: VulnerabilityCorrelator<T>,
    registry: ManifestParserRegistry,
    progress_reporter: P,
}

impl<S, T, P> AuditUseCase<S, T, P>
where
    S: RepositorySource,
    T: AdvisoryTransport,
    P: ProgressReporter,
{
    pub fn new(
        repository_source: S,
        correlator: VulnerabilityCorrelator<T>,
        progress_reporter: P,
    ) -> Self {
        Self {
            repository_source,
            correlator,
            registry: ManifestParserRegistry::new(),
            progress_reporter,
        }
    }

    /// Executes the audit
    ///
    /// # Returns
    /// The scan report; nothing is returned when any repository fails
    pub async fn execute(&self, request: AuditRequest) -> Result<ScanReport> {
        self.progress_reporter
            .report(&format!("📦 Listing repositories for {}", request.target));
        let repositories = self.repository_source.list_repositories().await?;
        self.progress_reporter
            .report(&format!("✅ Found {} repository(ies)", repositories.len()));

        let total = repositories.len();
        let mut reports = Vec::with_capacity(total);
        for (index, repo) in repositories.iter().enumerate() {
            self.progress_reporter
                .report_progress(index + 1, total, Some(&repo.name));
            match self.audit_repository(repo, &request.directories).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    self.progress_reporter
                        .report_error(&format!("❌ Failed to audit {}", repo.full_name));
                    return Err(e);
                }
            }
        }

        let report = ScanReport::new(request.target, reports);
        self.progress_reporter.report_completion(&format!(
            "Scanned {} repository(ies), {} with vulnerable dependencies",
            report.summary.total_repositories, report.summary.vulnerable_repositories
        ));
        Ok(report)
    }

    async fn audit_repository(
        &self,
        repo: &RepositoryMeta,
        directories: &[String],
    ) -> Result<RepoReport> {
        let dependencies = self.collect_dependencies(repo, directories).await?;
        tracing::debug!(
            repository = %repo.full_name,
            dependencies = dependencies.len(),
            "correlating dependencies"
        );

        let advisories = self.correlator.bulk_lookup(&dependencies).await?;
        let findings = dependencies
            .into_iter()
            .map(|dep| {
                let vulnerabilities = advisories
                    .get(&dep.composite_key())
                    .cloned()
                    .unwrap_or_default();
                DependencyFinding::new(dep, vulnerabilities)
            })
            .collect();

        Ok(RepoReport::build(repo.name.clone(), findings)
            .with_source(repo.html_url.clone(), repo.pushed_at))
    }

    /// Dependencies of every manifest found, in listing order
    async fn collect_dependencies(
        &self,
        repo: &RepositoryMeta,
        directories: &[String],
    ) -> Result<Vec<Dependency>> {
        let files = self
            .repository_source
            .list_files(repo, directories)
            .await?;
        let manifests = self
            .registry
            .detect_manifests(files.iter().map(String::as_str));

        let mut dependencies = Vec::new();
        for path in manifests {
            match self.repository_source.fetch_text(repo, &path).await? {
                Some(content) => dependencies.extend(self.registry.parse(&path, &content)),
                None => tracing::debug!(repository = %repo.full_name, manifest = %path, "manifest vanished"),
            }
        }
        Ok(dependencies)
    }
}

#[cfg(test)]
mod tests;
