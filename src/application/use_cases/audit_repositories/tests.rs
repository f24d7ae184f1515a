use super::*;
use crate::dependency_audit::domain::{Scope, Severity};
use crate::ports::outbound::{OsvQuery, TransportResponse};
use crate::shared::error::AuditError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// Mock implementations for testing
struct MockRepositorySource {
    repositories: Vec<RepositoryMeta>,
    /// repository name -> (path -> content)
    files: HashMap<String, Vec<(String, Option<String>)>>,
}

impl MockRepositorySource {
    fn new() -> Self {
        Self {
            repositories: Vec::new(),
            files: HashMap::new(),
        }
    }

    fn with_repo(mut self, name: &str, files: &[(&str, Option<&str>)]) -> Self {
        self.repositories
            .push(RepositoryMeta::new(name, format!("octocat/{}", name)));
        self.files.insert(
            name.to_string(),
            files
                .iter()
                .map(|(path, content)| (path.to_string(), content.map(str::to_string)))
                .collect(),
        );
        self
    }
}

#[async_trait]
impl RepositorySource for MockRepositorySource {
    async fn list_repositories(&self) -> Result<Vec<RepositoryMeta>> {
        Ok(self.repositories.clone())
    }

    async fn list_files(
        &self,
        repo: &RepositoryMeta,
        _directories: &[String],
    ) -> Result<Vec<String>> {
        Ok(self
            .files
            .get(&repo.name)
            .map(|files| files.iter().map(|(path, _)| path.clone()).collect())
            .unwrap_or_default())
    }

    async fn fetch_text(&self, repo: &RepositoryMeta, path: &str) -> Result<Option<String>> {
        Ok(self.files.get(&repo.name).and_then(|files| {
            files
                .iter()
                .find(|(p, _)| p == path)
                .and_then(|(_, content)| content.clone())
        }))
    }
}

/// Answers by package name; unknown packages have no advisories
struct MockTransport {
    advisories: HashMap<String, &'static str>,
    status: Option<u16>,
    calls: AtomicUsize,
}

impl MockTransport {
    fn new() -> Self {
        Self {
            advisories: HashMap::new(),
            status: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn with_advisory(mut self, package: &str, severity: &'static str) -> Self {
        self.advisories.insert(package.to_string(), severity);
        self
    }

    fn failing(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::new()
        }
    }
}

#[async_trait]
impl AdvisoryTransport for MockTransport {
    async fn query(&self, query: &OsvQuery) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.status {
            return Ok(TransportResponse {
                status,
                body: String::new(),
            });
        }
        let body = match self.advisories.get(&query.package.name) {
            Some(severity) => format!(
                r#"{{"vulns": [{{"id": "OSV-{name}", "severity": [{{"type": "{severity}"}}],
                    "affected": [{{"ranges": [{{"events": [{{"introduced": "0"}}, {{"fixed": "99.0.0"}}]}}]}}]}}]}}"#,
                name = query.package.name,
                severity = severity
            ),
            None => r#"{"vulns": []}"#.to_string(),
        };
        Ok(TransportResponse { status: 200, body })
    }
}

#[derive(Default)]
struct RecordingProgressReporter {
    messages: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingProgressReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.messages.lock().unwrap().push(format!(
            "{}/{} {}",
            current,
            total,
            message.unwrap_or_default()
        ));
    }

    fn report_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_completion(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

fn use_case(
    source: MockRepositorySource,
    transport: MockTransport,
) -> AuditUseCase<MockRepositorySource, MockTransport, RecordingProgressReporter> {
    AuditUseCase::new(
        source,
        VulnerabilityCorrelator::new(transport),
        RecordingProgressReporter::default(),
    )
}

fn request() -> AuditRequest {
    AuditRequest::new("octocat", AuditRequest::default_directories())
}

#[tokio::test]
async fn test_execute_scores_repositories() {
    let source = MockRepositorySource::new()
        .with_repo(
            "web",
            &[
                ("README.md", Some("# web")),
                (
                    "package.json",
                    Some(r#"{"dependencies": {"lodash": "4.17.11"}, "devDependencies": {"jest": "29.0.0"}}"#),
                ),
            ],
        )
        .with_repo(
            "api",
            &[("requirements.txt", Some("django==3.2.0\nrequests==2.31.0\n"))],
        );
    let transport = MockTransport::new()
        .with_advisory("lodash", "HIGH")
        .with_advisory("django", "CRITICAL");

    let report = use_case(source, transport).execute(request()).await.unwrap();

    assert_eq!(report.target, "octocat");
    assert_eq!(report.repositories.len(), 2);

    let web = &report.repositories[0];
    assert_eq!(web.repository, "web");
    assert_eq!(web.dependencies.len(), 2);
    assert_eq!(web.summary.risk_score, 5);
    assert_eq!(web.summary.vulnerable_dependency_count, 1);
    assert_eq!(web.summary.highest_severity, Severity::High);
    assert_eq!(web.dependencies[0].recommended_upgrades().to_vec(), vec!["99.0.0"]);

    let api = &report.repositories[1];
    assert_eq!(api.summary.risk_score, 6);
    assert_eq!(api.summary.highest_severity, Severity::Critical);

    assert_eq!(report.summary.vulnerable_repositories, 2);
    assert_eq!(report.summary.top_risks, vec!["api", "web"]);
}

#[tokio::test]
async fn test_repository_metadata_reaches_report() {
    let mut source = MockRepositorySource::new()
        .with_repo("web", &[("package.json", Some(r#"{"dependencies": {}}"#))])
        .with_repo("local", &[]);
    let pushed_at: chrono::DateTime<chrono::Utc> = "2024-05-01T12:00:00Z".parse().unwrap();
    source.repositories[0].html_url = Some("https://github.com/octocat/web".to_string());
    source.repositories[0].pushed_at = Some(pushed_at);

    let report = use_case(source, MockTransport::new())
        .execute(request())
        .await
        .unwrap();

    let web = &report.repositories[0];
    assert_eq!(web.html_url.as_deref(), Some("https://github.com/octocat/web"));
    assert_eq!(web.pushed_at, Some(pushed_at));
    assert_eq!(report.repositories[1].html_url, None);
    assert_eq!(report.repositories[1].pushed_at, None);
}

#[tokio::test]
async fn test_execute_keeps_manifest_order() {
    let source = MockRepositorySource::new().with_repo(
        "svc",
        &[
            ("go.mod", Some("require (\n\tgolang.org/x/net v0.1.0\n)\n")),
            ("Cargo.toml", Some("[dev-dependencies]\ntempfile = \"3\"\n")),
        ],
    );

    let report = use_case(source, MockTransport::new())
        .execute(request())
        .await
        .unwrap();

    let deps = &report.repositories[0].dependencies;
    assert_eq!(deps[0].dependency().name(), "golang.org/x/net");
    assert_eq!(deps[1].dependency().name(), "tempfile");
    assert_eq!(deps[1].dependency().scope(), Scope::Dev);
}

#[tokio::test]
async fn test_missing_and_malformed_manifests_are_skipped() {
    let source = MockRepositorySource::new().with_repo(
        "broken",
        &[
            ("package.json", Some("{ definitely not json")),
            ("pom.xml", None),
            ("requirements.txt", Some("flask\n")),
        ],
    );
    let transport = MockTransport::new();

    let uc = use_case(source, transport);
    let report = uc.execute(request()).await.unwrap();

    let repo = &report.repositories[0];
    assert_eq!(repo.dependencies.len(), 1);
    assert_eq!(repo.dependencies[0].dependency().version(), "*");
    assert_eq!(repo.summary.risk_score, 0);
    assert_eq!(repo.summary.vulnerable_dependency_count, 0);
    assert_eq!(repo.summary.highest_severity, Severity::Low);
    // flask has no pinned version, so no lookup is made
    assert_eq!(uc.correlator.cache().len(), 1);
}

#[tokio::test]
async fn test_lookup_failure_aborts_scan() {
    let source = MockRepositorySource::new()
        .with_repo("web", &[("package.json", Some(r#"{"dependencies": {"a": "1.0.0"}}"#))]);

    let uc = use_case(source, MockTransport::failing(500));
    let err = uc.execute(request()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AuditError>(),
        Some(AuditError::AdvisoryService { status: 500, .. })
    ));
    let messages = uc.progress_reporter.messages.lock().unwrap();
    assert_eq!(
        messages.last().map(String::as_str),
        Some("❌ Failed to audit octocat/web")
    );
}

#[tokio::test]
async fn test_progress_is_reported() {
    let source = MockRepositorySource::new()
        .with_repo("one", &[])
        .with_repo("two", &[]);

    let uc = use_case(source, MockTransport::new());
    let report = uc.execute(request()).await.unwrap();
    assert_eq!(report.summary.total_repositories, 2);

    let messages = uc.progress_reporter.messages.lock().unwrap();
    assert!(messages.iter().any(|m| m == "1/2 one"));
    assert!(messages.iter().any(|m| m == "2/2 two"));
    assert!(messages.last().unwrap().starts_with("Scanned 2 repository(ies)"));
}

#[tokio::test]
async fn test_empty_listing_produces_empty_report() {
    let report = use_case(MockRepositorySource::new(), MockTransport::new())
        .execute(request())
        .await
        .unwrap();
    assert!(report.repositories.is_empty());
    assert!(report.summary.top_risks.is_empty());
}
