//! Imagery API Library
//!
//! HTTP surface for the render pipeline. Exposes the setup plumbing so
//! integration tests can assemble a router against their own state.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
