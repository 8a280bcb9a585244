//! Path parameter extractors
//!
//! Local rows (ownerships, timeline events) are addressed by Snowflake id;
//! servers by their Discord id.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use bikenode_core::Snowflake;

use crate::response::ApiError;

/// A single `:id` segment parsed as a Snowflake
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.parse()
            .map(IdPath)
            .map_err(|_| ApiError::invalid_path(format!("Invalid id format: {raw}")))
    }
}

/// A single `:id` segment holding a Discord server id
#[derive(Debug, Clone)]
pub struct ServerIdPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ServerIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::invalid_path(format!("Invalid server id: {raw}")));
        }
        Ok(ServerIdPath(raw))
    }
}
