//! Entity to model mappers
//!
//! `From<Model> for Entity` conversions from database rows to domain objects.
//! Timeline events need their share rows as well, see [`timeline_event_with_shares`].

mod motorcycle;
mod ownership;
mod role;
mod server;
mod timeline;
mod user;

pub use timeline::{group_shares, timeline_event_with_shares};
