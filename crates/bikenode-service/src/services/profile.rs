//! Profile service - the signed-in user's full garage view

use bikenode_core::{DomainError, Snowflake};
use tracing::instrument;

use crate::dto::{
    OwnershipResponse, OwnershipWithEventsResponse, ProfileResponse, RoleResponse,
    TimelineEventResponse, UserResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::ownership::load_motorcycles;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// User, cached roles, and every ownership (ended ones included) with
    /// its motorcycle and timeline
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Snowflake) -> ServiceResult<ProfileResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let roles = self.ctx.role_repo().list_by_user(user_id).await?;
        let ownerships = self.ctx.ownership_repo().list_by_user(user_id, true).await?;
        let bikes = load_motorcycles(self.ctx, &ownerships).await?;

        let mut garage = Vec::with_capacity(ownerships.len());
        for ownership in &ownerships {
            let events = self.ctx.timeline_repo().list_by_ownership(ownership.id).await?;
            garage.push(OwnershipWithEventsResponse {
                ownership: OwnershipResponse::with_motorcycle(
                    ownership,
                    bikes.get(&ownership.motorcycle_id),
                ),
                events: events.iter().map(TimelineEventResponse::from).collect(),
            });
        }

        Ok(ProfileResponse {
            user: UserResponse::from(&user),
            roles: roles.iter().map(RoleResponse::from).collect(),
            ownerships: garage,
        })
    }
}
