//! Value objects - immutable types that represent domain concepts

mod page;
mod permissions;
mod snowflake;

pub use page::PageRequest;
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
