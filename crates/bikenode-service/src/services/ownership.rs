//! Ownership service
//!
//! The caller's garage: adding catalog motorcycles, soft-ending and removing
//! ownerships. Every mutation is checked against the acting user.

use std::collections::HashMap;

use bikenode_core::entities::{Motorcycle, Ownership};
use bikenode_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{AddOwnershipRequest, EndOwnershipRequest, OwnershipResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Parse a client-supplied local id
pub(crate) fn parse_id(field: &str, raw: &str) -> ServiceResult<Snowflake> {
    Snowflake::parse(raw.trim())
        .map_err(|_| ServiceError::validation(format!("{field} must be a numeric id")))
}

/// Load an ownership and make sure `user_id` holds it
pub(crate) async fn load_owned(
    ctx: &ServiceContext,
    ownership_id: Snowflake,
    user_id: Snowflake,
) -> ServiceResult<Ownership> {
    let ownership = ctx
        .ownership_repo()
        .find_by_id(ownership_id)
        .await?
        .ok_or(DomainError::OwnershipNotFound(ownership_id))?;

    if !ownership.is_owned_by(user_id) {
        return Err(DomainError::NotOwner(ownership_id).into());
    }
    Ok(ownership)
}

/// Look up catalog rows once per distinct motorcycle
pub(crate) async fn load_motorcycles(
    ctx: &ServiceContext,
    ownerships: &[Ownership],
) -> ServiceResult<HashMap<Snowflake, Motorcycle>> {
    let mut bikes = HashMap::new();
    for ownership in ownerships {
        if bikes.contains_key(&ownership.motorcycle_id) {
            continue;
        }
        if let Some(bike) = ctx.motorcycle_repo().find_by_id(ownership.motorcycle_id).await? {
            bikes.insert(bike.id, bike);
        }
    }
    Ok(bikes)
}

/// Ownership service
pub struct OwnershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OwnershipService<'a> {
    /// Create a new OwnershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a catalog motorcycle to the user's garage
    ///
    /// # Errors
    /// `MotorcycleNotFound` for an unknown catalog id, `ActiveOwnershipExists`
    /// if the user already actively owns it
    #[instrument(skip(self, request), fields(motorcycle_id = %request.motorcycle_id))]
    pub async fn add(
        &self,
        user_id: Snowflake,
        request: AddOwnershipRequest,
    ) -> ServiceResult<OwnershipResponse> {
        let motorcycle_id = parse_id("motorcycle_id", &request.motorcycle_id)?;

        let motorcycle = self
            .ctx
            .motorcycle_repo()
            .find_by_id(motorcycle_id)
            .await?
            .ok_or(DomainError::MotorcycleNotFound(motorcycle_id))?;

        if self
            .ctx
            .ownership_repo()
            .find_active(user_id, motorcycle_id)
            .await?
            .is_some()
        {
            return Err(DomainError::ActiveOwnershipExists(motorcycle_id).into());
        }

        let ownership = Ownership::new(
            self.ctx.generate_id(),
            user_id,
            motorcycle_id,
            request.purchase_date,
            request.notes.trim().to_string(),
        );
        // the partial unique index still guards a concurrent double add
        self.ctx.ownership_repo().create(&ownership).await?;

        info!(
            ownership_id = %ownership.id,
            user_id = %user_id,
            motorcycle = %motorcycle.display_name(),
            "Ownership added"
        );

        Ok(OwnershipResponse::with_motorcycle(&ownership, Some(&motorcycle)))
    }

    /// Record the end of an ownership without deleting its history
    #[instrument(skip(self, request))]
    pub async fn end(
        &self,
        ownership_id: Snowflake,
        user_id: Snowflake,
        request: EndOwnershipRequest,
    ) -> ServiceResult<OwnershipResponse> {
        let mut ownership = load_owned(self.ctx, ownership_id, user_id).await?;
        ownership.end(request.end_date, request.end_reason)?;
        self.ctx.ownership_repo().update(&ownership).await?;

        info!(ownership_id = %ownership_id, end_date = %request.end_date, "Ownership ended");

        let motorcycle = self
            .ctx
            .motorcycle_repo()
            .find_by_id(ownership.motorcycle_id)
            .await?;
        Ok(OwnershipResponse::with_motorcycle(&ownership, motorcycle.as_ref()))
    }

    /// Delete an ownership and, with it, its timeline
    #[instrument(skip(self))]
    pub async fn remove(&self, ownership_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        load_owned(self.ctx, ownership_id, user_id).await?;
        self.ctx.ownership_repo().delete(ownership_id).await?;

        info!(ownership_id = %ownership_id, user_id = %user_id, "Ownership removed");
        Ok(())
    }

    /// The user's ownerships, newest purchase first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Snowflake,
        include_inactive: bool,
    ) -> ServiceResult<Vec<OwnershipResponse>> {
        let ownerships = self
            .ctx
            .ownership_repo()
            .list_by_user(user_id, include_inactive)
            .await?;
        let bikes = load_motorcycles(self.ctx, &ownerships).await?;

        Ok(ownerships
            .iter()
            .map(|o| OwnershipResponse::with_motorcycle(o, bikes.get(&o.motorcycle_id)))
            .collect())
    }
}
