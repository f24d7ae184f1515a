use super::build_http_client;
use crate::ports::outbound::{AdvisoryTransport, OsvQuery, TransportResponse};
use crate::shared::error::AuditError;
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Duration;

/// OsvHttpTransport adapter posting queries to an OSV-compatible endpoint
///
/// One request per call. Status handling (retry, 400 as "no data") belongs
/// to the correlator, so every HTTP status is returned as-is.
pub struct OsvHttpTransport {
    client: reqwest::Client,
    api_url: String,
}

impl OsvHttpTransport {
    pub const DEFAULT_API_URL: &'static str = "https://api.osv.dev/v1/query";

    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn transport_error(&self, err: reqwest::Error) -> AuditError {
        AuditError::Transport {
            target: self.api_url.clone(),
            details: err.to_string(),
        }
    }
}

#[async_trait]
impl AdvisoryTransport for OsvHttpTransport {
    async fn query(&self, query: &OsvQuery) -> Result<TransportResponse> {
        let response = self
            .client
            .post(&self.api_url)
            .json(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!(
            package = %query.package.name,
            version = %query.version,
            status,
            "advisory query"
        );

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport =
            OsvHttpTransport::new(OsvHttpTransport::DEFAULT_API_URL, Duration::from_secs(30));
        assert!(transport.is_ok());
        assert_eq!(
            transport.unwrap().api_url(),
            "https://api.osv.dev/v1/query"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // port 9 (discard) on localhost is closed in test environments
        let transport =
            OsvHttpTransport::new("http://127.0.0.1:9/v1/query", Duration::from_secs(2)).unwrap();
        let err = transport
            .query(&OsvQuery::new("npm", "lodash", "4.17.11"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AuditError>(),
            Some(AuditError::Transport { .. })
        ));
    }
}
