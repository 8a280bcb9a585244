//! # bikenode-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dto::*;
pub use services::{
    AuthService, LoginRedirect, MotorcycleService, OwnershipService, ProfileService,
    ServerConfigService, ServerService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SignedIn, TimelineService,
};
