//! Integration test utilities for BikeNode
//!
//! This crate provides helpers for driving the HTTP surface end to end,
//! either in-process against fakes or against a live Postgres-backed server.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
