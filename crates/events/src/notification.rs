//! Notifications published to interested parties after a committed transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stowage_auth::{CallerContext, Role};
use stowage_core::{ItemId, UserId, WarehouseId};

/// Who should receive a notification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Audience {
    /// One specific user (typically the item owner).
    User(UserId),
    /// Every admin and employee.
    Staff,
    /// Admins only.
    Admins,
    /// Staff following a particular warehouse.
    Warehouse(WarehouseId),
}

impl Audience {
    /// Whether `caller` belongs to this audience.
    ///
    /// `followed_warehouse` is the warehouse the caller subscribed to, if any;
    /// warehouse-scoped groups are only delivered to staff following it.
    pub fn includes(&self, caller: &CallerContext, followed_warehouse: Option<WarehouseId>) -> bool {
        match self {
            Audience::User(id) => caller.id == *id,
            Audience::Staff => caller.is_staff(),
            Audience::Admins => caller.role == Role::Admin,
            Audience::Warehouse(w) => caller.is_staff() && followed_warehouse == Some(*w),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewItem,
    ItemStatusChanged,
    ReleaseRequest,
    ItemMoved,
    ItemConditionChanged,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewItem => "new_item",
            NotificationKind::ItemStatusChanged => "item_status_changed",
            NotificationKind::ReleaseRequest => "release_request",
            NotificationKind::ItemMoved => "item_moved",
            NotificationKind::ItemConditionChanged => "item_condition_changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub audience: Audience,
    pub title: String,
    pub message: String,
    pub item_id: Option<ItemId>,
    pub warehouse_id: Option<WarehouseId>,
    /// Machine-readable details (e.g. `{"new_status": "stored"}`).
    pub data: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        audience: Audience,
        title: impl Into<String>,
        message: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            audience,
            title: title.into(),
            message: message.into(),
            item_id: None,
            warehouse_id: None,
            data: serde_json::Value::Null,
            occurred_at,
        }
    }

    pub fn for_item(mut self, item_id: ItemId, warehouse_id: WarehouseId) -> Self {
        self.item_id = Some(item_id);
        self.warehouse_id = Some(warehouse_id);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_audience_matches_only_that_user() {
        let owner = UserId::new();
        let audience = Audience::User(owner);
        assert!(audience.includes(&CallerContext::client(owner), None));
        assert!(!audience.includes(&CallerContext::admin(UserId::new()), None));
    }

    #[test]
    fn group_audiences_follow_roles() {
        let employee = CallerContext::employee(UserId::new());
        let client = CallerContext::client(UserId::new());
        assert!(Audience::Staff.includes(&employee, None));
        assert!(!Audience::Staff.includes(&client, None));
        assert!(!Audience::Admins.includes(&employee, None));
    }

    #[test]
    fn warehouse_audience_requires_following_staff() {
        let w = WarehouseId::new();
        let employee = CallerContext::employee(UserId::new());
        assert!(Audience::Warehouse(w).includes(&employee, Some(w)));
        assert!(!Audience::Warehouse(w).includes(&employee, None));
        assert!(!Audience::Warehouse(w).includes(&CallerContext::client(UserId::new()), Some(w)));
    }

    #[test]
    fn audience_serializes_tagged() {
        let json = serde_json::to_value(Audience::Staff).unwrap();
        assert_eq!(json, serde_json::json!({"type": "staff"}));
    }
}
