//! Infrastructure-backed notification transports.
//!
//! The bus abstraction lives in `stowage-events` as pure mechanics; this
//! module provides the networked implementations.

#[cfg(feature = "redis")]
pub mod redis_pubsub;

#[cfg(feature = "redis")]
pub use redis_pubsub::{RedisBusError, RedisNotificationBus};
