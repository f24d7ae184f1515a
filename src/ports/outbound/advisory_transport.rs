use crate::shared::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Body of one OSV `query` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsvQuery {
    pub version: String,
    pub package: OsvPackage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsvPackage {
    /// OSV spelling, e.g. `PyPI` or `crates.io`
    pub ecosystem: String,
    pub name: String,
}

impl OsvQuery {
    pub fn new(ecosystem: &str, name: &str, version: &str) -> Self {
        Self {
            version: version.to_string(),
            package: OsvPackage {
                ecosystem: ecosystem.to_string(),
                name: name.to_string(),
            },
        }
    }
}

/// Raw HTTP outcome of a query; status interpretation is left to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// AdvisoryTransport port for reaching the vulnerability database
///
/// Implementations send exactly one request per call and never retry.
/// Connection failures and timeouts surface as `AuditError::Transport`.
#[async_trait]
pub trait AdvisoryTransport: Send + Sync {
    async fn query(&self, query: &OsvQuery) -> Result<TransportResponse>;
}
