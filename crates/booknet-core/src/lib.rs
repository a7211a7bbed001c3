//! Shared building blocks for Booknet services: error responses, tracing setup,
//! HTTP middleware, health probes and environment helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
