//! Role cache / visibility mappers

use bikenode_core::entities::{ServerVisibility, UserRole};
use bikenode_core::value_objects::{Permissions, Snowflake};

use crate::models::{UserRoleModel, VisibilityModel};

impl From<UserRoleModel> for UserRole {
    fn from(model: UserRoleModel) -> Self {
        UserRole {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            server_id: Snowflake::new(model.server_id),
            role_id: model.role_id,
            role_name: model.role_name,
            role_color: model.role_color,
            permissions: Permissions::from_i64(model.permissions),
        }
    }
}

impl From<VisibilityModel> for ServerVisibility {
    fn from(model: VisibilityModel) -> Self {
        ServerVisibility {
            user_id: Snowflake::new(model.user_id),
            server_id: Snowflake::new(model.server_id),
            is_visible: model.is_visible,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
