//! Failures talking to Discord or the bot API

use thiserror::Error;

/// Outbound HTTP failure; none of these are retried
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure
    #[error("{service} request failed: {message}")]
    Network {
        service: &'static str,
        message: String,
    },

    /// The upstream answered with a non-2xx status
    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },

    /// The upstream body was not the JSON we expected
    #[error("{service} returned an undecodable body: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } | Self::Status { .. } => "UPSTREAM_FAILURE",
            Self::Decode { .. } => "DECODE_FAILURE",
        }
    }

    pub fn service(&self) -> &'static str {
        match self {
            Self::Network { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. } => service,
        }
    }
}
