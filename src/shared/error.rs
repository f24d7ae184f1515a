use chrono::{Local, TimeZone};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no vulnerabilities at or above the `--fail-on` threshold
    Success = 0,
    /// Vulnerabilities were detected at or above the configured threshold
    VulnerabilitiesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (rate limit, network error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::VulnerabilitiesDetected => write!(f, "Vulnerabilities Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Fatal errors raised while auditing repositories.
///
/// Manifest parse failures are not part of this enum: they are recovered
/// inside the parser registry and never abort a scan.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Repository host rate limit exceeded. Resets at {reset}.\n\n💡 Hint: Retry after the reset time or provide a GITHUB_TOKEN")]
    HostRateLimited { reset: ResetTime },

    #[error("Repository host returned status {status} for {url}")]
    HostRequest { status: u16, url: String },

    #[error("Vulnerability service is rate limiting requests (status {status}) after {attempts} attempt(s)")]
    AdvisoryRateLimited { status: u16, attempts: u32 },

    #[error("Vulnerability service returned status {status} for {package}")]
    AdvisoryService { status: u16, package: String },

    #[error("Could not reach {target}: {details}")]
    Transport { target: String, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid repository directory")]
    InvalidProjectPath { path: PathBuf, reason: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for configuration and request building
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl AuditError {
    /// Whether this error is a rate-limit condition from either remote service
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            AuditError::HostRateLimited { .. } | AuditError::AdvisoryRateLimited { .. }
        )
    }
}

/// Rate-limit reset time reported by the repository host (unix epoch seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTime(pub Option<i64>);

impl fmt::Display for ResetTime {
    /// Renders the epoch as local time, or "later" when unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ts) => match Local.timestamp_opt(ts, 0).single() {
                Some(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S %Z")),
                None => write!(f, "{}", ts),
            },
            None => write!(f, "later"),
        }
    }
}

/// Builds the user-facing message for a fatal scan error.
///
/// Rate-limit conditions carry a retry time, connectivity problems are
/// reported as such, and everything else is an unexpected error.
pub fn describe_failure(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AuditError>() {
        Some(AuditError::HostRateLimited { reset }) => format!(
            "GitHub rate limit reached. Retry after {} or provide a GITHUB_TOKEN.",
            reset
        ),
        Some(e @ AuditError::AdvisoryRateLimited { .. }) => {
            format!("{}. Retry the scan in a few minutes.", e)
        }
        Some(e @ AuditError::Transport { .. }) => {
            format!("Could not reach required APIs: {}", e)
        }
        Some(e) => e.to_string(),
        None => match err.downcast_ref::<reqwest::Error>() {
            Some(e) if e.is_connect() || e.is_timeout() => {
                format!("Could not reach required APIs: {}", e)
            }
            _ => format!("Unexpected error: {}", err),
        },
    }
}
