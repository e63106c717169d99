//! Redis pub/sub transport for notifications (optional).
//!
//! Pub/sub is not durable: a subscriber that is offline misses messages.
//! That matches notification semantics (at-most-once, best-effort). Consumers
//! live outside this service and subscribe to the channel directly.

use redis::Commands;

use stowage_events::{EventBus, Notification};

#[derive(Debug)]
pub enum RedisBusError {
    Redis(String),
    Serialize(String),
}

/// Publishes JSON-encoded notifications on one Redis channel.
#[derive(Debug, Clone)]
pub struct RedisNotificationBus {
    client: redis::Client,
    channel: String,
}

impl RedisNotificationBus {
    pub fn new(redis_url: impl AsRef<str>, channel: impl Into<String>) -> Result<Self, RedisBusError> {
        let client = redis::Client::open(redis_url.as_ref()).map_err(|e| RedisBusError::Redis(e.to_string()))?;
        Ok(Self {
            client,
            channel: channel.into(),
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl EventBus<Notification> for RedisNotificationBus {
    type Error = RedisBusError;

    fn publish(&self, message: Notification) -> Result<(), Self::Error> {
        let payload = serde_json::to_string(&message).map_err(|e| RedisBusError::Serialize(e.to_string()))?;

        let mut conn = self
            .client
            .get_connection()
            .map_err(|e| RedisBusError::Redis(e.to_string()))?;

        let _: i64 = conn
            .publish(&self.channel, payload)
            .map_err(|e| RedisBusError::Redis(e.to_string()))?;

        Ok(())
    }
}
