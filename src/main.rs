mod cli;
mod config;

use clap::Parser;
use cli::Args;
use config::ConfigFile;
use depaudit::adapters::outbound::console::StderrProgressReporter;
use depaudit::adapters::outbound::filesystem::{
    FileSystemWriter, LocalRepositorySource, StdoutPresenter,
};
use depaudit::adapters::outbound::network::{GitHubRepositorySource, OsvHttpTransport};
use depaudit::application::dto::AuditRequest;
use depaudit::application::use_cases::{
    AuditUseCase, RetryPolicy, VulnerabilityCorrelator, DEFAULT_CONCURRENCY,
};
use depaudit::dependency_audit::domain::{ScanReport, Severity};
use depaudit::ports::outbound::{OutputPresenter, RepositorySource};
use depaudit::shared::error::{describe_failure, AuditError, ExitCode};
use depaudit::shared::Result;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_logging(args.verbose);

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ {}\n", describe_failure(&e));

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("Caused by: {}", err);
                source = err.source();
            }
            ExitCode::ApplicationError
        }
    };
    process::exit(code.as_i32());
}

/// Library events go to stderr; `--verbose` forces debug for this crate
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("depaudit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Effective settings: CLI flags over config file over defaults
#[derive(Debug)]
struct Settings {
    osv_api_url: String,
    github_api_url: String,
    directories: Vec<String>,
    concurrency: usize,
    timeout: Duration,
    max_attempts: u32,
    fail_on: Option<Severity>,
}

impl Settings {
    fn resolve(args: &Args, config: ConfigFile) -> Result<Self> {
        let config_fail_on = match config.fail_on {
            Some(label) => Some(Severity::from_label(&label).ok_or_else(|| {
                AuditError::Validation {
                    message: format!("fail_on '{}' is not a severity", label),
                }
            })?),
            None => None,
        };

        Ok(Self {
            osv_api_url: args
                .osv_url
                .clone()
                .or(config.osv_api_url)
                .unwrap_or_else(|| OsvHttpTransport::DEFAULT_API_URL.to_string()),
            github_api_url: config
                .github_api_url
                .unwrap_or_else(|| GitHubRepositorySource::DEFAULT_API_URL.to_string()),
            directories: config
                .directories
                .unwrap_or_else(AuditRequest::default_directories),
            concurrency: args
                .concurrency
                .or(config.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
            timeout: Duration::from_secs(
                config.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            max_attempts: config
                .max_attempts
                .unwrap_or(RetryPolicy::default().max_attempts),
            fail_on: args.fail_on.or(config_fail_on),
        })
    }
}

fn load_config(args: &Args) -> Result<ConfigFile> {
    let loaded = match &args.config {
        Some(path) => Some(config::load_config_from_path(Path::new(path))?),
        None => config::discover_config(&std::env::current_dir()?)?,
    };
    Ok(loaded.unwrap_or_default())
}

async fn run(args: Args) -> Result<ExitCode> {
    let settings = Settings::resolve(&args, load_config(&args)?)?;
    tracing::debug!(?settings, "resolved settings");

    let report = match &args.github_owner {
        Some(owner) => {
            let source = GitHubRepositorySource::new(owner.clone(), settings.timeout)?
                .with_api_url(settings.github_api_url.clone())
                .with_token(args.token.clone())
                .exclude_forks(args.exclude_forks)
                .updated_since(args.updated_since);
            audit(source, &settings, owner.clone()).await?
        }
        None => {
            let project_path = PathBuf::from(args.path.as_deref().unwrap_or("."));
            validate_project_path(&project_path)?;
            let target = project_path.display().to_string();
            audit(LocalRepositorySource::new(project_path)?, &settings, target).await?
        }
    };

    let json = serde_json::to_string_pretty(&report)?;
    let presenter: Box<dyn OutputPresenter> = match &args.output {
        Some(output_path) => Box::new(FileSystemWriter::new(PathBuf::from(output_path))),
        None => Box::new(StdoutPresenter::new()),
    };
    presenter.present(&json)?;

    print_summary(&report);

    Ok(exit_code_for(&report, settings.fail_on))
}

async fn audit<S: RepositorySource>(
    source: S,
    settings: &Settings,
    target: String,
) -> Result<ScanReport> {
    let transport = OsvHttpTransport::new(settings.osv_api_url.clone(), settings.timeout)?;
    let correlator = VulnerabilityCorrelator::new(transport)
        .with_retry_policy(RetryPolicy {
            max_attempts: settings.max_attempts,
            ..RetryPolicy::default()
        })
        .with_concurrency(settings.concurrency);

    let use_case = AuditUseCase::new(source, correlator, StderrProgressReporter::new());
    use_case
        .execute(AuditRequest::new(target, settings.directories.clone()))
        .await
}

/// A clean scan never fails: its highest severity still reads LOW.
fn exit_code_for(report: &ScanReport, fail_on: Option<Severity>) -> ExitCode {
    match fail_on {
        Some(threshold)
            if report.has_vulnerabilities()
                && report.highest_severity().rank() >= threshold.rank() =>
        {
            ExitCode::VulnerabilitiesDetected
        }
        _ => ExitCode::Success,
    }
}

fn colored_severity(severity: Severity) -> String {
    match severity {
        Severity::Critical => severity.as_str().red().bold().to_string(),
        Severity::High => severity.as_str().red().to_string(),
        Severity::Medium => severity.as_str().yellow().to_string(),
        Severity::Low | Severity::Unknown => severity.as_str().dimmed().to_string(),
    }
}

fn print_summary(report: &ScanReport) {
    eprintln!();
    for repo in &report.repositories {
        if repo.is_vulnerable() {
            eprintln!(
                "   {} {}: risk {}, {} vulnerable dependenc(ies), highest {}",
                "⚠".yellow(),
                repo.repository.bold(),
                repo.summary.risk_score,
                repo.summary.vulnerable_dependency_count,
                colored_severity(repo.summary.highest_severity)
            );
        } else {
            eprintln!("   {} {}: no known vulnerabilities", "✓".green(), repo.repository);
        }
    }

    let summary = &report.summary;
    let line = format!(
        "{} repository(ies) scanned, {} vulnerable",
        summary.total_repositories, summary.vulnerable_repositories
    );
    if summary.vulnerable_repositories > 0 {
        eprintln!("\n{}", line.red().bold());
        eprintln!("Top risks: {}", summary.top_risks.join(", "));
    } else {
        eprintln!("\n{}", line.green().bold());
    }
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    let metadata = std::fs::symlink_metadata(path).map_err(|e| AuditError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(AuditError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}
