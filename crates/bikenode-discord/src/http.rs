//! Shared outbound HTTP client

use std::time::Duration;

use bikenode_common::HttpClientConfig;

use crate::error::ClientSetupError;

/// reqwest client used for every outbound call
///
/// Redirects are never followed: an OAuth or bot endpoint answering with a
/// 3xx is treated as a failed call rather than chased to another host.
pub fn build_http_client(config: &HttpClientConfig) -> Result<reqwest::Client, ClientSetupError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("bikenode/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
