//! HTTP API: configuration, authentication, routing, and request/response
//! mapping for the storage service.

pub mod app;
pub mod config;
pub mod middleware;
