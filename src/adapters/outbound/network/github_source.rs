use super::build_http_client;
use crate::ports::outbound::{RepositoryMeta, RepositorySource};
use crate::shared::error::{AuditError, ResetTime};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    full_name: String,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

/// GitHubRepositorySource adapter for the public repositories of one owner
///
/// Uses the REST API: `/users/{owner}/repos` for discovery and the contents
/// API for listings and file text. Directory listings and file texts are
/// cached for the lifetime of the source.
///
/// # Errors
/// A 404 is never an error for listings or files. Exhausted rate limits
/// (403 with no remaining quota, or 429) abort with
/// `AuditError::HostRateLimited`.
pub struct GitHubRepositorySource {
    client: reqwest::Client,
    api_url: String,
    owner: String,
    token: Option<String>,
    include_forks: bool,
    updated_since: Option<DateTime<Utc>>,
    listing_cache: DashMap<String, Vec<String>>,
    text_cache: DashMap<String, Option<String>>,
}

impl GitHubRepositorySource {
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";
    const PER_PAGE: usize = 100;

    pub fn new(owner: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_url: Self::DEFAULT_API_URL.to_string(),
            owner: owner.into(),
            token: None,
            include_forks: true,
            updated_since: None,
            listing_cache: DashMap::new(),
            text_cache: DashMap::new(),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn exclude_forks(mut self, exclude: bool) -> Self {
        self.include_forks = !exclude;
        self
    }

    /// Skips repositories last pushed before `cutoff`
    pub fn updated_since(mut self, cutoff: Option<DateTime<Utc>>) -> Self {
        self.updated_since = cutoff;
        self
    }

    fn contents_url(&self, repo: &RepositoryMeta, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let base = format!(
            "{}/repos/{}/{}/contents",
            self.api_url,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&repo.name)
        );
        if encoded.is_empty() {
            base
        } else {
            format!("{}/{}", base, encoded.join("/"))
        }
    }

    fn rate_limit_reset(headers: &HeaderMap) -> ResetTime {
        ResetTime(
            headers
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok()),
        )
    }

    fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return true;
        }
        status == StatusCode::FORBIDDEN
            && headers
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.trim() == "0")
    }

    /// Issues a GET; `Ok(None)` means 404
    async fn get(&self, url: &str, accept: &str) -> Result<Option<reqwest::Response>> {
        let mut request = self.client.get(url).header(ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await.map_err(|e| AuditError::Transport {
            target: url.to_string(),
            details: e.to_string(),
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if Self::is_rate_limited(status, response.headers()) {
            return Err(AuditError::HostRateLimited {
                reset: Self::rate_limit_reset(response.headers()),
            }
            .into());
        }
        if !status.is_success() {
            return Err(AuditError::HostRequest {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }
        Ok(Some(response))
    }

    fn keep(&self, repo: &GitHubRepo) -> bool {
        if !self.include_forks && repo.fork {
            return false;
        }
        match (self.updated_since, repo.pushed_at) {
            (Some(cutoff), Some(pushed_at)) => pushed_at >= cutoff,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    async fn list_directory(&self, repo: &RepositoryMeta, directory: &str) -> Result<Vec<String>> {
        let cache_key = format!("{}/{}", repo.full_name, directory);
        if let Some(cached) = self.listing_cache.get(&cache_key) {
            return Ok(cached.clone());
        }

        let url = self.contents_url(repo, directory);
        let files = match self.get(&url, JSON_MEDIA_TYPE).await? {
            None => Vec::new(),
            Some(response) => {
                let body: serde_json::Value = response
                    .json()
                    .await
                    .with_context(|| format!("Invalid contents listing from {}", url))?;
                // a file path answers with an object rather than a listing
                match body {
                    serde_json::Value::Array(_) => {
                        let entries: Vec<ContentEntry> = serde_json::from_value(body)
                            .with_context(|| format!("Invalid contents listing from {}", url))?;
                        entries
                            .into_iter()
                            .filter(|e| e.entry_type == "file")
                            .map(|e| e.path)
                            .collect()
                    }
                    _ => Vec::new(),
                }
            }
        };

        self.listing_cache.insert(cache_key, files.clone());
        Ok(files)
    }
}

#[async_trait]
impl RepositorySource for GitHubRepositorySource {
    async fn list_repositories(&self) -> Result<Vec<RepositoryMeta>> {
        let mut repositories = Vec::new();
        let owner = urlencoding::encode(&self.owner);

        for page in 1.. {
            let url = format!(
                "{}/users/{}/repos?per_page={}&page={}&type=public&sort=updated",
                self.api_url,
                owner,
                Self::PER_PAGE,
                page
            );
            let response = self
                .get(&url, JSON_MEDIA_TYPE)
                .await?
                .ok_or_else(|| AuditError::HostRequest {
                    status: StatusCode::NOT_FOUND.as_u16(),
                    url: url.clone(),
                })?;
            let batch: Vec<GitHubRepo> = response
                .json()
                .await
                .with_context(|| format!("Invalid repository listing from {}", url))?;

            let batch_len = batch.len();
            repositories.extend(batch.into_iter().filter(|r| self.keep(r)).map(|r| {
                RepositoryMeta {
                    name: r.name,
                    full_name: r.full_name,
                    fork: r.fork,
                    html_url: r.html_url,
                    pushed_at: r.pushed_at,
                }
            }));

            if batch_len < Self::PER_PAGE {
                break;
            }
        }

        tracing::debug!(owner = %self.owner, count = repositories.len(), "repositories listed");
        Ok(repositories)
    }

    async fn list_files(
        &self,
        repo: &RepositoryMeta,
        directories: &[String],
    ) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for directory in directories {
            files.extend(self.list_directory(repo, directory.trim_matches('/')).await?);
        }
        Ok(files)
    }

    async fn fetch_text(&self, repo: &RepositoryMeta, path: &str) -> Result<Option<String>> {
        let cache_key = format!("{}/{}", repo.full_name, path);
        if let Some(cached) = self.text_cache.get(&cache_key) {
            return Ok(cached.clone());
        }

        let url = self.contents_url(repo, path);
        let text = match self.get(&url, RAW_MEDIA_TYPE).await? {
            None => None,
            Some(response) => {
                let bytes = response.bytes().await.map_err(|e| AuditError::Transport {
                    target: url.clone(),
                    details: e.to_string(),
                })?;
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
        };

        self.text_cache.insert(cache_key, text.clone());
        Ok(text)
    }
}
