//! Session token handling

mod jwt;

pub use jwt::{Claims, JwtService, SessionToken, SESSION_TTL_SECS};
