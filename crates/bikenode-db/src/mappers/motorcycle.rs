//! Motorcycle entity <-> model mapper

use bikenode_core::entities::Motorcycle;
use bikenode_core::value_objects::Snowflake;

use crate::models::MotorcycleModel;

impl From<MotorcycleModel> for Motorcycle {
    fn from(model: MotorcycleModel) -> Self {
        Motorcycle {
            id: Snowflake::new(model.id),
            year: model.year,
            make: model.make,
            model: model.model,
            package: model.package,
            category: model.category,
            engine: model.engine,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
