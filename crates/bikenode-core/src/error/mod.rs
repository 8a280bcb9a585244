//! Domain error types

mod domain_error;
mod upstream_error;

pub use domain_error::DomainError;
pub use upstream_error::UpstreamError;
