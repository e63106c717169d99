//! Service wiring: which store, which notification transports.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};

use stowage_auth::CallerContext;
use stowage_core::WarehouseId;
use stowage_events::{Notification, NotificationDispatcher, NotificationSink};
use stowage_infra::service::{DirectoryService, ItemLifecycleService, LocationRegistryService};
use stowage_infra::store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore};

use crate::config::AppConfig;

pub type DynStore = Arc<dyn InventoryStore>;

pub struct AppServices {
    pub items: ItemLifecycleService<DynStore>,
    pub locations: LocationRegistryService<DynStore>,
    pub directory: DirectoryService<DynStore>,
    realtime_tx: broadcast::Sender<Notification>,
}

/// Feeds committed notifications to connected SSE clients.
///
/// Lossy: with nobody listening the notification is simply dropped.
struct RealtimeSink {
    tx: broadcast::Sender<Notification>,
}

impl NotificationSink for RealtimeSink {
    fn name(&self) -> &'static str {
        "realtime"
    }

    fn publish(&self, notification: Notification) -> Result<(), String> {
        let _ = self.tx.send(notification);
        Ok(())
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: DynStore = match &config.database_url {
        Some(url) => {
            let pg = PostgresInventoryStore::connect(url).await?;
            pg.migrate().await?;
            tracing::info!("using postgres storage");
            Arc::new(pg)
        }
        None => {
            tracing::info!("STOWAGE_DATABASE_URL not set; using in-memory storage");
            Arc::new(InMemoryInventoryStore::new())
        }
    };

    let (realtime_tx, _) = broadcast::channel(config.realtime_buffer.max(1));
    let notifier = NotificationDispatcher::new().with_sink(Arc::new(RealtimeSink {
        tx: realtime_tx.clone(),
    }));
    let notifier = with_redis(notifier, config)?;

    Ok(AppServices::new(store, notifier, realtime_tx, config.default_reserve_hours))
}

#[cfg(feature = "redis")]
fn with_redis(notifier: NotificationDispatcher, config: &AppConfig) -> anyhow::Result<NotificationDispatcher> {
    use stowage_events::BusSink;
    use stowage_infra::event_bus::RedisNotificationBus;

    let Some(url) = &config.redis_url else {
        return Ok(notifier);
    };
    let bus = RedisNotificationBus::new(url, "stowage.notifications")
        .map_err(|e| anyhow::anyhow!("redis notification bus: {e:?}"))?;
    tracing::info!(channel = bus.channel(), "fanning notifications out over redis");
    Ok(notifier.with_sink(Arc::new(BusSink::new("redis", bus))))
}

#[cfg(not(feature = "redis"))]
fn with_redis(notifier: NotificationDispatcher, config: &AppConfig) -> anyhow::Result<NotificationDispatcher> {
    if config.redis_url.is_some() {
        tracing::warn!("STOWAGE_REDIS_URL is set but the redis feature is disabled; ignoring");
    }
    Ok(notifier)
}

impl AppServices {
    pub fn new(
        store: DynStore,
        notifier: NotificationDispatcher,
        realtime_tx: broadcast::Sender<Notification>,
        default_reserve_hours: i64,
    ) -> Self {
        Self {
            items: ItemLifecycleService::new(store.clone(), notifier),
            locations: LocationRegistryService::new(store.clone())
                .with_default_reservation_hours(default_reserve_hours),
            directory: DirectoryService::new(store),
            realtime_tx,
        }
    }

    /// Live notifications visible to `caller`, as server-sent events.
    pub fn notification_stream(
        &self,
        caller: CallerContext,
        followed_warehouse: Option<WarehouseId>,
    ) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>> + use<>> {
        let stream = BroadcastStream::new(self.realtime_tx.subscribe()).filter_map(move |msg| {
            // Lagged receivers skip what they missed.
            let notification = msg.ok()?;
            if !notification.audience.includes(&caller, followed_warehouse) {
                return None;
            }
            let data = serde_json::to_string(&notification).ok()?;
            Some(Ok(SseEvent::default().event(notification.kind.as_str()).data(data)))
        });

        Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
    }
}
