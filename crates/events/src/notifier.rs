//! Post-commit notification fan-out.
//!
//! Lifecycle operations hand their notifications to a [`NotificationDispatcher`]
//! only after the transition is committed. Delivery is at-most-once and
//! best-effort: a failing sink is logged and skipped, never reported back to
//! the operation that produced the notification.

use std::sync::Arc;

use crate::bus::EventBus;
use crate::notification::Notification;

/// Object-safe publishing side of a notification transport.
pub trait NotificationSink: Send + Sync {
    /// Short transport name used in logs.
    fn name(&self) -> &'static str;

    fn publish(&self, notification: Notification) -> Result<(), String>;
}

/// Adapts any [`EventBus`] of notifications into a sink.
pub struct BusSink<B> {
    name: &'static str,
    bus: B,
}

impl<B> BusSink<B> {
    pub fn new(name: &'static str, bus: B) -> Self {
        Self { name, bus }
    }
}

impl<B> NotificationSink for BusSink<B>
where
    B: EventBus<Notification>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn publish(&self, notification: Notification) -> Result<(), String> {
        self.bus.publish(notification).map_err(|e| format!("{e:?}"))
    }
}

#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Publish every notification to every sink. Returns how many deliveries
    /// succeeded.
    pub fn dispatch(&self, notifications: Vec<Notification>) -> usize {
        let mut delivered = 0;
        for notification in notifications {
            for sink in &self.sinks {
                let kind = notification.kind.as_str();
                match sink.publish(notification.clone()) {
                    Ok(()) => delivered += 1,
                    Err(error) => {
                        tracing::warn!(sink = sink.name(), kind, %error, "notification publish failed");
                    }
                }
            }
        }
        delivered
    }
}

impl core::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("sinks", &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}
