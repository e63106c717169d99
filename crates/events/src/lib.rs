//! Lifecycle events, notifications, and the pub/sub mechanics that carry them.

pub mod bus;
pub mod event;
pub mod notification;
pub mod notifier;

pub use bus::EventBus;
pub use event::Event;
pub use notification::{Audience, Notification, NotificationKind};
pub use notifier::{BusSink, NotificationDispatcher, NotificationSink};
