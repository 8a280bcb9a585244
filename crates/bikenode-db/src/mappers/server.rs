//! Server / server config entity <-> model mappers

use bikenode_core::entities::{Server, ServerConfig};
use bikenode_core::value_objects::Snowflake;

use crate::models::{ServerConfigModel, ServerModel};

impl From<ServerModel> for Server {
    fn from(model: ServerModel) -> Self {
        Server {
            id: Snowflake::new(model.id),
            discord_server_id: model.discord_server_id,
            name: model.name,
            icon: model.icon,
            owner_discord_id: model.owner_discord_id,
            member_count: model.member_count,
            bot_joined_at: model.bot_joined_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ServerConfigModel> for ServerConfig {
    fn from(model: ServerConfigModel) -> Self {
        ServerConfig {
            id: Snowflake::new(model.id),
            server_id: Snowflake::new(model.server_id),
            create_brand_roles: model.create_brand_roles,
            create_type_roles: model.create_type_roles,
            create_model_roles: model.create_model_roles,
            story_feed_channel_id: model.story_feed_channel_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
