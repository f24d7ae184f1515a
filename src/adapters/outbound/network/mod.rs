/// Network adapters for external API calls
mod github_source;
mod osv_transport;

pub use github_source::GitHubRepositorySource;
pub use osv_transport::OsvHttpTransport;

use crate::shared::Result;
use std::time::Duration;

/// Shared client settings for every outbound HTTP adapter
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let user_agent = format!("depaudit/{}", env!("CARGO_PKG_VERSION"));
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?)
}
