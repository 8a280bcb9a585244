//! Route handlers
//!
//! All HTTP request handlers organized by area.

pub mod api;
pub mod auth;
pub mod health;
pub mod profile;
pub mod servers;
pub mod timeline;
