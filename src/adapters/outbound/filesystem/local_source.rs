use crate::ports::outbound::{RepositoryMeta, RepositorySource};
use crate::shared::error::AuditError;
use crate::shared::security::{check_manifest_file, FileCheck, MAX_MANIFEST_SIZE};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// LocalRepositorySource adapter exposing one checked-out directory as a repository
///
/// Only regular files are listed; symbolic links are skipped while listing
/// and rejected when fetched directly, as are files above the manifest size
/// limit.
pub struct LocalRepositorySource {
    root: PathBuf,
    name: String,
    max_file_size: u64,
}

impl LocalRepositorySource {
    /// # Errors
    /// Returns `AuditError::InvalidProjectPath` if `root` is not a directory.
    pub fn new(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(AuditError::InvalidProjectPath {
                path: root,
                reason: "Directory does not exist or is not a directory".to_string(),
            }
            .into());
        }

        let name = root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| root.display().to_string());

        Ok(Self {
            root,
            name,
            max_file_size: MAX_MANIFEST_SIZE,
        })
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Resolves a repository-relative path, refusing anything that escapes the root
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let relative = Path::new(relative);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(AuditError::Validation {
                message: format!(
                    "Path {} must stay inside the repository",
                    relative.display()
                ),
            }
            .into());
        }
        Ok(self.root.join(relative))
    }

    fn list_directory(&self, directory: &str) -> Result<Vec<String>> {
        let dir = self.resolve(directory)?;
        match fs::symlink_metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            _ => return Ok(Vec::new()),
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Failed to list {}", dir.display()))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        let prefix = directory.trim_matches('/');
        Ok(names
            .into_iter()
            .map(|name| {
                if prefix.is_empty() {
                    name
                } else {
                    format!("{}/{}", prefix, name)
                }
            })
            .collect())
    }
}

#[async_trait]
impl RepositorySource for LocalRepositorySource {
    async fn list_repositories(&self) -> Result<Vec<RepositoryMeta>> {
        Ok(vec![RepositoryMeta::new(
            self.name.clone(),
            self.root.display().to_string(),
        )])
    }

    async fn list_files(
        &self,
        _repo: &RepositoryMeta,
        directories: &[String],
    ) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for directory in directories {
            files.extend(self.list_directory(directory)?);
        }
        Ok(files)
    }

    async fn fetch_text(&self, _repo: &RepositoryMeta, path: &str) -> Result<Option<String>> {
        let full_path = self.resolve(path)?;
        match check_manifest_file(&full_path, self.max_file_size)? {
            FileCheck::Missing => Ok(None),
            FileCheck::Readable => {
                let content = fs::read_to_string(&full_path)
                    .with_context(|| format!("Failed to read {}", full_path.display()))?;
                Ok(Some(content))
            }
        }
    }
}
