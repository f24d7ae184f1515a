use async_trait::async_trait;
use depaudit::ports::outbound::{OsvQuery, TransportResponse};
use depaudit::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock AdvisoryTransport answering from canned OSV bodies keyed by
/// `ecosystem|name|version` (OSV ecosystem names)
#[derive(Default)]
pub struct MockAdvisoryTransport {
    pub responses: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl MockAdvisoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one advisory with a single fixed version
    pub fn with_advisory(
        mut self,
        ecosystem: &str,
        name: &str,
        version: &str,
        id: &str,
        severity: &str,
        fixed: &str,
    ) -> Self {
        let body = format!(
            r#"{{"vulns": [{{
                "id": "{id}",
                "summary": "Advisory for {name}",
                "severity": [{{"type": "{severity}", "score": "7.5"}}],
                "affected": [{{"ranges": [{{"type": "ECOSYSTEM", "events": [{{"introduced": "0"}}, {{"fixed": "{fixed}"}}]}}]}}],
                "references": [{{"url": "https://osv.dev/vulnerability/{id}"}}]
            }}]}}"#
        );
        self.responses
            .insert(format!("{}|{}|{}", ecosystem, name, version), body);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisoryTransport for MockAdvisoryTransport {
    async fn query(&self, query: &OsvQuery) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = format!(
            "{}|{}|{}",
            query.package.ecosystem, query.package.name, query.version
        );
        let body = self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| "{}".to_string());
        Ok(TransportResponse { status: 200, body })
    }
}
