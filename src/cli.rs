use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgGroup, Parser};
use depaudit::dependency_audit::domain::Severity;

/// Audit repositories for vulnerable dependencies using OSV advisories
#[derive(Parser, Debug)]
#[command(name = "depaudit")]
#[command(version)]
#[command(about = "Audit repositories for vulnerable dependencies using OSV advisories", long_about = None)]
#[command(group(ArgGroup::new("target").args(["path", "github_owner"])))]
pub struct Args {
    /// Path to a local repository checkout (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Audit every public repository of this GitHub user or organization
    #[arg(short = 'g', long, value_name = "OWNER")]
    pub github_owner: Option<String>,

    /// Skip forked repositories (GitHub only)
    #[arg(long, requires = "github_owner")]
    pub exclude_forks: bool,

    /// Skip repositories not pushed since this date, YYYY-MM-DD (GitHub only)
    #[arg(long, value_name = "DATE", value_parser = parse_date, requires = "github_owner")]
    pub updated_since: Option<DateTime<Utc>>,

    /// GitHub token for higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// OSV query endpoint
    #[arg(long, env = "OSV_API", value_name = "URL")]
    pub osv_url: Option<String>,

    /// Configuration file (defaults to ./depaudit.config.yml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exit with code 1 when a vulnerability at or above this severity is found
    #[arg(long, value_name = "SEVERITY", value_parser = parse_severity)]
    pub fail_on: Option<Severity>,

    /// Maximum in-flight advisory lookups per repository
    #[arg(long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses a `YYYY-MM-DD` date as the start of that day in UTC
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: {}. Expected YYYY-MM-DD", value))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("Invalid date: {}", value))
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Invalid concurrency: {}. Must be at least 1", value)),
    }
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    Severity::from_label(value).ok_or_else(|| {
        format!(
            "Invalid severity: {}. Please specify CRITICAL, HIGH, MEDIUM, LOW or UNKNOWN",
            value
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("depaudit").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert!(args.path.is_none());
        assert!(args.github_owner.is_none());
        assert!(!args.exclude_forks);
        assert!(args.fail_on.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_github_options() {
        let args = parse(&[
            "--github-owner",
            "octocat",
            "--exclude-forks",
            "--updated-since",
            "2024-03-01",
        ])
        .unwrap();
        assert_eq!(args.github_owner.as_deref(), Some("octocat"));
        assert!(args.exclude_forks);
        assert_eq!(
            args.updated_since.unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_path_and_owner_conflict() {
        assert!(parse(&["--path", ".", "--github-owner", "octocat"]).is_err());
    }

    #[test]
    fn test_github_only_flags_require_owner() {
        assert!(parse(&["--exclude-forks"]).is_err());
    }

    #[test]
    fn test_invalid_date() {
        let err = parse(&["-g", "octocat", "--updated-since", "03/01/2024"]).unwrap_err();
        assert!(err.to_string().contains("Expected YYYY-MM-DD"));
    }

    #[test]
    fn test_fail_on_is_case_insensitive() {
        let args = parse(&["--fail-on", "medium"]).unwrap();
        assert_eq!(args.fail_on, Some(Severity::Medium));
        assert!(parse(&["--fail-on", "severe"]).is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(parse(&["--concurrency", "0"]).is_err());
        assert_eq!(parse(&["--concurrency", "2"]).unwrap().concurrency, Some(2));
    }
}
