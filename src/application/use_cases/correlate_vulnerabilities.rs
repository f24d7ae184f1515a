use crate::dependency_audit::domain::{
    Dependency, DependencyKey, Ecosystem, VulnerabilityRecord, ANY_VERSION,
};
use crate::dependency_audit::services::{normalize_advisory, OsvQueryResponse};
use crate::ports::outbound::{AdvisoryTransport, OsvQuery};
use crate::shared::error::AuditError;
use crate::shared::Result;
use anyhow::Context;
use dashmap::DashMap;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Process-lifetime advisory cache; entries are never evicted
pub type AdvisoryCache = DashMap<DependencyKey, Vec<VulnerabilityRecord>>;

/// Default number of in-flight lookups for `bulk_lookup`
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Retry schedule for rate-limited or unavailable responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles on each further one
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff after the 0-based `attempt`: `base_delay * 2^attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// VulnerabilityCorrelator joins dependencies with OSV advisories
///
/// Lookups are cached per `(ecosystem, lowercase name, version)`. Two
/// concurrent misses for the same key may both query; whichever result is
/// stored first is returned to both callers.
///
/// # Type Parameters
/// * `T` - AdvisoryTransport implementation
pub struct VulnerabilityCorrelator<T: AdvisoryTransport> {
    transport: T,
    cache: Arc<AdvisoryCache>,
    retry_policy: RetryPolicy,
    concurrency: usize,
}

impl<T: AdvisoryTransport> VulnerabilityCorrelator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: Arc::new(DashMap::new()),
            retry_policy: RetryPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Sets the `bulk_lookup` concurrency (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Shares an existing cache, e.g. across several scans in one process
    pub fn with_cache(mut self, cache: Arc<AdvisoryCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<AdvisoryCache> {
        &self.cache
    }

    /// Advisories affecting one package version
    ///
    /// Unqueryable input (empty name or version, or the `*` wildcard) yields
    /// an empty list without touching the network.
    ///
    /// # Errors
    /// - `AuditError::AdvisoryRateLimited` when every attempt was rate limited
    /// - `AuditError::AdvisoryService` for any other non-success status
    /// - `AuditError::Transport` when the service could not be reached
    ///
    /// Failed lookups are not cached.
    pub async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Vec<VulnerabilityRecord>> {
        let key = DependencyKey::new(ecosystem.as_str(), name, version);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(ecosystem = %ecosystem, name, version, "advisory cache hit");
            return Ok(cached.clone());
        }

        let records = if name.is_empty() || version.is_empty() || version == ANY_VERSION {
            Vec::new()
        } else {
            self.query_with_retry(ecosystem, name, version).await?
        };

        Ok(self.cache.entry(key).or_insert(records).clone())
    }

    async fn query_with_retry(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Vec<VulnerabilityRecord>> {
        let query = OsvQuery::new(ecosystem.osv_name(), name, version);
        let package = format!("{}/{}@{}", ecosystem, name, version);
        let mut last_status = 0;

        for attempt in 0..self.retry_policy.max_attempts {
            let response = self.transport.query(&query).await?;

            match response.status {
                200..=299 => {
                    let parsed: OsvQueryResponse = serde_json::from_str(&response.body)
                        .with_context(|| format!("Invalid advisory response for {}", package))?;
                    return Ok(parsed.vulns.iter().map(normalize_advisory).collect());
                }
                // unknown ecosystem/version pairs: nothing to report
                400 => return Ok(Vec::new()),
                429 | 503 => {
                    last_status = response.status;
                    let delay = self.retry_policy.delay_for(attempt);
                    tracing::warn!(
                        package = %package,
                        status = response.status,
                        attempt = attempt + 1,
                        delay_secs = delay.as_secs_f64(),
                        "Advisory service busy, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                status => {
                    return Err(AuditError::AdvisoryService { status, package }.into());
                }
            }
        }

        Err(AuditError::AdvisoryRateLimited {
            status: last_status,
            attempts: self.retry_policy.max_attempts,
        }
        .into())
    }

    /// Looks up every dependency, keyed by `ecosystem|name|version`
    ///
    /// Runs up to the configured number of lookups at once and stops at the
    /// first failure.
    pub async fn bulk_lookup(
        &self,
        dependencies: &[Dependency],
    ) -> Result<HashMap<String, Vec<VulnerabilityRecord>>> {
        let mut unique: HashMap<String, &Dependency> = HashMap::new();
        for dep in dependencies {
            unique.entry(dep.composite_key()).or_insert(dep);
        }

        stream::iter(unique)
            .map(|(composite, dep)| async move {
                let records = self
                    .lookup(dep.ecosystem(), dep.name(), dep.version())
                    .await?;
                Ok::<_, anyhow::Error>((composite, records))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await
    }
}
