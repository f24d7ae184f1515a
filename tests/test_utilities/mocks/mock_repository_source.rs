use async_trait::async_trait;
use depaudit::prelude::*;
use std::collections::HashMap;

/// Mock RepositorySource serving in-memory repositories
#[derive(Default)]
pub struct MockRepositorySource {
    pub repositories: Vec<RepositoryMeta>,
    /// repository name -> (path, content)
    pub files: HashMap<String, Vec<(String, String)>>,
    pub should_fail: bool,
}

impl MockRepositorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, name: &str, files: &[(&str, &str)]) -> Self {
        self.repositories
            .push(RepositoryMeta::new(name, format!("octocat/{}", name)));
        self.files.insert(
            name.to_string(),
            files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl RepositorySource for MockRepositorySource {
    async fn list_repositories(&self) -> Result<Vec<RepositoryMeta>> {
        if self.should_fail {
            anyhow::bail!("Mock repository source failure");
        }
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
                .map(|(_, content)| content.clone())
        }))
    }
}
