use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A repository as reported by its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMeta {
    /// Short name used in reports
    pub name: String,
    /// `owner/name` for hosted repositories, the root path for local ones
    pub full_name: String,
    pub fork: bool,
    pub html_url: Option<String>,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl RepositoryMeta {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            fork: false,
            html_url: None,
            pushed_at: None,
        }
    }
}

/// RepositorySource port for repository listing and file retrieval
///
/// Not-found conditions are never errors: a missing directory lists as
/// empty and a missing file fetches as `None`.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Repositories to audit, in the order they should be scanned
    async fn list_repositories(&self) -> Result<Vec<RepositoryMeta>>;

    /// Repository-relative paths of the files directly inside `directories`
    ///
    /// An empty directory string denotes the repository root.
    async fn list_files(&self, repo: &RepositoryMeta, directories: &[String])
        -> Result<Vec<String>>;

    /// UTF-8 text of one file
    async fn fetch_text(&self, repo: &RepositoryMeta, path: &str) -> Result<Option<String>>;
}
