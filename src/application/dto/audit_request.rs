/// Directories searched for manifests when none are configured (`""` is the root)
pub const DEFAULT_DIRECTORIES: &[&str] = &["", "src", "app", "backend", "frontend", "server", "client"];

/// AuditRequest - Internal request DTO for the audit use case
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Label for the scanned target (owner name or local path)
    pub target: String,
    /// Repository-relative directories searched for manifests
    pub directories: Vec<String>,
}

impl AuditRequest {
    pub fn new(target: impl Into<String>, directories: Vec<String>) -> Self {
        Self {
            target: target.into(),
            directories,
        }
    }

    pub fn default_directories() -> Vec<String> {
        DEFAULT_DIRECTORIES.iter().map(|d| d.to_string()).collect()
    }
}
