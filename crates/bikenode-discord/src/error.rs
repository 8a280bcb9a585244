//! Error mapping for outbound requests

use bikenode_core::UpstreamError;

/// Building a client from configuration failed
#[derive(Debug, thiserror::Error)]
pub enum ClientSetupError {
    #[error("Invalid {0} URL: {1}")]
    InvalidUrl(&'static str, String),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Transport-level reqwest failure (connect, TLS, timeout, body read)
pub(crate) fn network(service: &'static str, e: &reqwest::Error) -> UpstreamError {
    UpstreamError::Network {
        service,
        message: e.to_string(),
    }
}

/// A response body that does not decode; anything else is transport
pub(crate) fn from_body_error(service: &'static str, e: &reqwest::Error) -> UpstreamError {
    if e.is_decode() {
        UpstreamError::Decode {
            service,
            message: e.to_string(),
        }
    } else {
        network(service, e)
    }
}

/// Reject non-2xx responses
pub(crate) fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
        })
    }
}
