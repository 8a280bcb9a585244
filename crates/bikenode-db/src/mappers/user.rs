//! User entity <-> model mapper

use bikenode_core::entities::User;
use bikenode_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            discord_id: model.discord_id,
            username: model.username,
            discriminator: model.discriminator,
            avatar: model.avatar,
            email: model.email,
            access_token: model.access_token,
            refresh_token: model.refresh_token,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
