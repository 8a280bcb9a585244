//! Timeline service
//!
//! Events recorded against an ownership. Only the owner of the ownership
//! may create, change or delete its events.

use bikenode_core::entities::{TimelineEvent, TimelineEventType};
use bikenode_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CreateTimelineEventRequest, TimelineEventResponse, UpdateTimelineEventRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::ownership::{load_owned, parse_id};
use super::server::linked_server_ids;

fn parse_event_type(raw: &str) -> ServiceResult<TimelineEventType> {
    raw.parse::<TimelineEventType>()
        .map_err(|e| ServiceError::validation(e.to_string()))
}

/// Timeline service
pub struct TimelineService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TimelineService<'a> {
    /// Create a new TimelineService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Share targets must be known servers the user is linked to
    async fn resolve_shares(
        &self,
        user_id: Snowflake,
        raw: &[String],
    ) -> ServiceResult<Vec<Snowflake>> {
        let requested = raw
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|id| parse_id("shared_to_servers", id))
            .collect::<ServiceResult<Vec<_>>>()?;
        if requested.is_empty() {
            return Ok(requested);
        }

        let linked = linked_server_ids(self.ctx, user_id).await?;
        for &server_id in &requested {
            if linked.contains(&server_id) {
                continue;
            }
            if self.ctx.server_repo().find_by_id(server_id).await?.is_none() {
                return Err(DomainError::ServerNotFound(server_id.to_string()).into());
            }
            return Err(DomainError::NotServerMember(server_id.to_string()).into());
        }
        Ok(requested)
    }

    /// Load an event whose ownership belongs to `user_id`
    async fn load_owned_event(
        &self,
        event_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<TimelineEvent> {
        let event = self
            .ctx
            .timeline_repo()
            .find_by_id(event_id)
            .await?
            .ok_or(DomainError::TimelineEventNotFound(event_id))?;
        load_owned(self.ctx, event.ownership_id, user_id).await?;
        Ok(event)
    }

    /// Record a new event on one of the user's ownerships
    #[instrument(skip(self, request), fields(ownership_id = %request.ownership_id))]
    pub async fn add(
        &self,
        user_id: Snowflake,
        request: CreateTimelineEventRequest,
    ) -> ServiceResult<TimelineEventResponse> {
        let ownership_id = parse_id("ownership_id", &request.ownership_id)?;
        let event_type = parse_event_type(&request.event_type)?;
        let ownership = load_owned(self.ctx, ownership_id, user_id).await?;
        let shares = self.resolve_shares(user_id, &request.shared_to_servers).await?;

        let mut event = TimelineEvent::new(
            self.ctx.generate_id(),
            ownership.id,
            event_type,
            request.date,
            request.title.trim().to_string(),
        );
        event.description = request.description;
        event.media_url = request.media_url;
        event.is_public = request.is_public;
        event.set_shares(shares);

        self.ctx.timeline_repo().create(&event).await?;

        info!(
            event_id = %event.id,
            ownership_id = %ownership.id,
            event_type = %event.event_type,
            shares = event.shared_to_servers.len(),
            "Timeline event added"
        );

        Ok(TimelineEventResponse::from(&event))
    }

    /// Apply a partial update; a given share list replaces the old one
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        event_id: Snowflake,
        user_id: Snowflake,
        request: UpdateTimelineEventRequest,
    ) -> ServiceResult<TimelineEventResponse> {
        let mut event = self.load_owned_event(event_id, user_id).await?;

        if let Some(raw) = request.event_type.as_deref() {
            event.event_type = parse_event_type(raw)?;
        }
        if let Some(date) = request.date {
            event.date = date;
        }
        if let Some(title) = request.title {
            event.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            event.description = description;
        }
        if let Some(is_public) = request.is_public {
            event.is_public = is_public;
        }
        if let Some(raw) = request.shared_to_servers.as_deref() {
            let shares = self.resolve_shares(user_id, raw).await?;
            event.set_shares(shares);
        }
        event.touch();

        self.ctx.timeline_repo().update(&event).await?;
        info!(event_id = %event_id, "Timeline event updated");

        Ok(TimelineEventResponse::from(&event))
    }

    /// Delete an event; returns it so callers can clean up its media
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        event_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<TimelineEventResponse> {
        let event = self.load_owned_event(event_id, user_id).await?;
        self.ctx.timeline_repo().delete(event_id).await?;

        info!(event_id = %event_id, "Timeline event removed");
        Ok(TimelineEventResponse::from(&event))
    }
}
