//! Lifecycle events emitted by committed transitions, and the notifications
//! they fan out to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use stowage_core::{ItemId, UserId, WarehouseId};
use stowage_events::{Audience, Event, Notification, NotificationKind};

use crate::item::{Condition, Item, ItemStatus, UniqueCode};

/// Identifying snapshot of the item an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub item_id: ItemId,
    pub unique_code: UniqueCode,
    pub name: String,
    pub owner_id: UserId,
    pub warehouse_id: WarehouseId,
}

impl From<&Item> for ItemRef {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id,
            unique_code: item.unique_code.clone(),
            name: item.name.clone(),
            owner_id: item.owner_id,
            warehouse_id: item.warehouse_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEvent {
    Created {
        item: ItemRef,
        occurred_at: DateTime<Utc>,
    },
    StatusChanged {
        item: ItemRef,
        previous: ItemStatus,
        new: ItemStatus,
        location_code: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    ReleaseRequested {
        item: ItemRef,
        occurred_at: DateTime<Utc>,
    },
    Moved {
        item: ItemRef,
        from_code: String,
        to_code: String,
        occurred_at: DateTime<Utc>,
    },
    ConditionChanged {
        item: ItemRef,
        previous: Condition,
        new: Condition,
        occurred_at: DateTime<Utc>,
    },
}

impl ItemEvent {
    pub fn item(&self) -> &ItemRef {
        match self {
            ItemEvent::Created { item, .. }
            | ItemEvent::StatusChanged { item, .. }
            | ItemEvent::ReleaseRequested { item, .. }
            | ItemEvent::Moved { item, .. }
            | ItemEvent::ConditionChanged { item, .. } => item,
        }
    }

    /// Notifications to publish once the transition that raised this event
    /// has been committed.
    pub fn notifications(&self) -> Vec<Notification> {
        let at = self.occurred_at();
        let item = self.item();
        let scoped = |n: Notification| n.for_item(item.item_id, item.warehouse_id);

        match self {
            ItemEvent::Created { .. } => {
                let build = |audience| {
                    scoped(Notification::new(
                        NotificationKind::NewItem,
                        audience,
                        "New item submitted",
                        format!("{} ({}) is awaiting intake", item.name, item.unique_code),
                        at,
                    ))
                    .with_data(json!({ "unique_code": item.unique_code }))
                };
                vec![build(Audience::Staff), build(Audience::Warehouse(item.warehouse_id))]
            }
            ItemEvent::StatusChanged { new, location_code, .. } => {
                let message = match location_code {
                    Some(code) if *new == ItemStatus::Stored => {
                        format!("Your item {} is now stored at {}", item.name, code)
                    }
                    _ => format!("Your item {} is now {}", item.name, new),
                };
                vec![scoped(Notification::new(
                    NotificationKind::ItemStatusChanged,
                    Audience::User(item.owner_id),
                    "Item status updated",
                    message,
                    at,
                ))
                .with_data(json!({ "new_status": new }))]
            }
            ItemEvent::ReleaseRequested { .. } => {
                let build = |audience| {
                    scoped(Notification::new(
                        NotificationKind::ReleaseRequest,
                        audience,
                        "Release requested",
                        format!("Owner requested release of {} ({})", item.name, item.unique_code),
                        at,
                    ))
                };
                vec![build(Audience::Staff), build(Audience::Warehouse(item.warehouse_id))]
            }
            ItemEvent::Moved { from_code, to_code, .. } => vec![scoped(Notification::new(
                NotificationKind::ItemMoved,
                Audience::User(item.owner_id),
                "Item moved",
                format!("Your item {} was moved from {} to {}", item.name, from_code, to_code),
                at,
            ))
            .with_data(json!({ "from": from_code, "to": to_code }))],
            ItemEvent::ConditionChanged { previous, new, .. } => vec![scoped(Notification::new(
                NotificationKind::ItemConditionChanged,
                Audience::User(item.owner_id),
                "Item condition updated",
                format!("Condition of {} changed: {} → {}", item.name, previous, new),
                at,
            ))
            .with_data(json!({ "previous": previous, "new": new }))],
        }
    }
}

impl Event for ItemEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ItemEvent::Created { .. } => "storage.item.created",
            ItemEvent::StatusChanged { .. } => "storage.item.status_changed",
            ItemEvent::ReleaseRequested { .. } => "storage.item.release_requested",
            ItemEvent::Moved { .. } => "storage.item.moved",
            ItemEvent::ConditionChanged { .. } => "storage.item.condition_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ItemEvent::Created { occurred_at, .. }
            | ItemEvent::StatusChanged { occurred_at, .. }
            | ItemEvent::ReleaseRequested { occurred_at, .. }
            | ItemEvent::Moved { occurred_at, .. }
            | ItemEvent::ConditionChanged { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_ref() -> ItemRef {
        ItemRef {
            item_id: ItemId::new(),
            unique_code: UniqueCode::generate(Utc::now()),
            name: "Bicycle".to_string(),
            owner_id: UserId::new(),
            warehouse_id: WarehouseId::new(),
        }
    }

    #[test]
    fn created_goes_to_staff_and_warehouse_group() {
        let item = item_ref();
        let event = ItemEvent::Created { item: item.clone(), occurred_at: Utc::now() };
        let audiences: Vec<_> = event.notifications().iter().map(|n| n.audience).collect();
        assert_eq!(audiences, vec![Audience::Staff, Audience::Warehouse(item.warehouse_id)]);
        assert_eq!(event.event_type(), "storage.item.created");
    }

    #[test]
    fn status_change_goes_to_owner_with_new_status() {
        let item = item_ref();
        let event = ItemEvent::StatusChanged {
            item: item.clone(),
            previous: ItemStatus::PendingIntake,
            new: ItemStatus::Stored,
            location_code: Some("A1-01".to_string()),
            occurred_at: Utc::now(),
        };
        let notes = event.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].audience, Audience::User(item.owner_id));
        assert_eq!(notes[0].kind, NotificationKind::ItemStatusChanged);
        assert_eq!(notes[0].data["new_status"], "stored");
        assert_eq!(notes[0].item_id, Some(item.item_id));
        assert!(notes[0].message.contains("A1-01"));
    }

    #[test]
    fn release_request_notifies_staff() {
        let event = ItemEvent::ReleaseRequested { item: item_ref(), occurred_at: Utc::now() };
        assert!(event
            .notifications()
            .iter()
            .all(|n| n.kind == NotificationKind::ReleaseRequest));
        assert_eq!(event.notifications()[0].audience, Audience::Staff);
    }
}
