//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    checkbox, AddOwnershipRequest, CreateTimelineEventRequest, EndOwnershipRequest,
    MotorcycleSearchQuery, SetVisibilityRequest, UpdateServerConfigRequest,
    UpdateTimelineEventRequest, UserMotorcyclesQuery,
};

pub use responses::{
    CatalogImportSummary, ChannelListResponse, ChannelResponse, HealthChecks, HealthResponse,
    MotorcycleResponse, MotorcycleSearchResponse, NotificationStatus, OwnershipResponse,
    OwnershipWithEventsResponse, ProfileResponse, RoleResponse, ServerConfigResponse,
    ServerConfigUpdateResponse, TimelineEventResponse, UserResponse, UserServerResponse,
    VisibilityResponse,
};
