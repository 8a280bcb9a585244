//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use bikenode_core::entities::{
    Motorcycle, Ownership, Server, ServerChannel, ServerConfig, ServerVisibility, TimelineEvent,
    User, UserRole,
};

use super::responses::{
    ChannelResponse, MotorcycleResponse, OwnershipResponse, RoleResponse, ServerConfigResponse,
    TimelineEventResponse, UserResponse, UserServerResponse, VisibilityResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            discord_id: user.discord_id.clone(),
            username: user.username.clone(),
            tag: user.tag(),
            discriminator: user.discriminator.clone(),
            avatar: user.avatar.clone(),
            avatar_url: user.avatar_url(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&UserRole> for RoleResponse {
    fn from(role: &UserRole) -> Self {
        Self {
            server_id: role.server_id.to_string(),
            role_id: role.role_id.clone(),
            name: role.role_name.clone(),
            color: role.color_hex(),
            permissions: role.permissions.to_i64().to_string(),
        }
    }
}

// ============================================================================
// Motorcycle / Ownership Mappers
// ============================================================================

impl From<&Motorcycle> for MotorcycleResponse {
    fn from(bike: &Motorcycle) -> Self {
        Self {
            id: bike.id.to_string(),
            year: bike.year,
            make: bike.make.clone(),
            model: bike.model.clone(),
            package: bike.package.clone(),
            category: bike.category.clone(),
            engine: bike.engine.clone(),
            display_name: bike.display_name(),
        }
    }
}

impl OwnershipResponse {
    /// Ownership with its catalog entry attached
    pub fn with_motorcycle(ownership: &Ownership, motorcycle: Option<&Motorcycle>) -> Self {
        Self {
            id: ownership.id.to_string(),
            motorcycle_id: ownership.motorcycle_id.to_string(),
            motorcycle: motorcycle.map(MotorcycleResponse::from),
            purchase_date: ownership.purchase_date,
            end_date: ownership.end_date,
            end_reason: ownership.end_reason.clone(),
            notes: ownership.notes.clone(),
            is_active: ownership.is_active(),
            created_at: ownership.created_at,
            updated_at: ownership.updated_at,
        }
    }
}

impl From<&Ownership> for OwnershipResponse {
    fn from(ownership: &Ownership) -> Self {
        Self::with_motorcycle(ownership, None)
    }
}

impl From<&TimelineEvent> for TimelineEventResponse {
    fn from(event: &TimelineEvent) -> Self {
        Self {
            id: event.id.to_string(),
            ownership_id: event.ownership_id.to_string(),
            event_type: event.event_type.as_str().to_string(),
            date: event.date,
            title: event.title.clone(),
            description: event.description.clone(),
            media_url: event.media_url.clone(),
            is_public: event.is_public,
            shared_to_servers: event.shared_to_servers.iter().map(ToString::to_string).collect(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

// ============================================================================
// Server Mappers
// ============================================================================

impl UserServerResponse {
    pub fn new(server: &Server, is_visible: bool, is_admin: bool) -> Self {
        Self {
            id: server.id.to_string(),
            discord_server_id: server.discord_server_id.clone(),
            name: server.name.clone(),
            icon_url: server.icon_url(),
            member_count: server.member_count,
            is_visible,
            is_admin,
        }
    }
}

impl From<&ServerVisibility> for VisibilityResponse {
    fn from(visibility: &ServerVisibility) -> Self {
        Self {
            server_id: visibility.server_id.to_string(),
            is_visible: visibility.is_visible,
            updated_at: visibility.updated_at,
        }
    }
}

impl From<&ServerConfig> for ServerConfigResponse {
    fn from(config: &ServerConfig) -> Self {
        Self {
            id: config.id.to_string(),
            server_id: config.server_id.to_string(),
            create_brand_roles: config.create_brand_roles,
            create_type_roles: config.create_type_roles,
            create_model_roles: config.create_model_roles,
            story_feed_channel_id: config.story_feed_channel_id.clone(),
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

impl From<ServerChannel> for ChannelResponse {
    fn from(channel: ServerChannel) -> Self {
        Self {
            id: channel.id,
            name: channel.name,
            kind: channel.kind,
            position: channel.position,
        }
    }
}
