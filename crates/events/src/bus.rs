//! Notification transport abstraction (mechanics only).
//!
//! A bus is a fire-and-forget publisher:
//!
//! - **Transport-agnostic**: Redis pub/sub, an in-process channel, ...
//! - **Best-effort delivery**: notifications are at-most-once; a subscriber
//!   that is offline simply misses them
//! - **No persistence**: the bus distributes, the store is the source of truth

use std::sync::Arc;

/// Domain-agnostic publishing side of a pub/sub transport.
///
/// `publish()` can fail (network error, serialization). Callers that publish
/// after a committed transition must treat the failure as non-fatal.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }
}
