//! HTTP surface: router, endpoints, middleware, and shared API types.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
