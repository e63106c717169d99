//! Infrastructure layer: persistence, notification transports, and the
//! application services that tie the storage domain to them.

pub mod event_bus;
pub mod service;
pub mod store;
