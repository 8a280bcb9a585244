//! Ownership entity <-> model mapper

use bikenode_core::entities::Ownership;
use bikenode_core::value_objects::Snowflake;

use crate::models::OwnershipModel;

impl From<OwnershipModel> for Ownership {
    fn from(model: OwnershipModel) -> Self {
        Ownership {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            motorcycle_id: Snowflake::new(model.motorcycle_id),
            purchase_date: model.purchase_date,
            end_date: model.end_date,
            end_reason: model.end_reason,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
