//! Item lifecycle state machine.
//!
//! Every operation is a pure function of the caller, the entities it reads,
//! and the clock. It validates role, ownership, and status preconditions and,
//! on success, returns a [`Transition`]: the new item state, the locations
//! whose occupancy changed, the ledger record to append, and the events to
//! announce. Persisting a transition is all-or-nothing and is the caller's
//! job; so is publishing its events after the commit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stowage_auth::{CallerContext, Role, require_owner, require_staff};
use stowage_core::{CategoryId, DomainError, DomainResult, ItemId, LocationId, WarehouseId};
use stowage_events::Notification;

use crate::directory::{Category, Warehouse};
use crate::events::{ItemEvent, ItemRef};
use crate::item::{Condition, Item, ItemStatus, UniqueCode};
use crate::location::StorageLocation;
use crate::movement::{ActionType, MovementRecord};

/// Outcome of a successful lifecycle operation.
///
/// `item` and `locations` keep the version they were read at; the store
/// compares it against what is persisted when committing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub item: Item,
    pub locations: Vec<StorageLocation>,
    pub movement: Option<MovementRecord>,
    pub events: Vec<ItemEvent>,
}

impl Transition {
    fn item_only(item: Item, events: Vec<ItemEvent>) -> Self {
        Self {
            item,
            locations: Vec::new(),
            movement: None,
            events,
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.events.iter().flat_map(ItemEvent::notifications).collect()
    }
}

/// Submission of a new item by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub condition: Option<Condition>,
    pub category_id: CategoryId,
    pub warehouse_id: WarehouseId,
    /// Preferred slot. Recorded as a hint, not claimed.
    #[serde(default)]
    pub storage_location_id: Option<LocationId>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub estimated_value: Option<Decimal>,
    #[serde(default)]
    pub planned_release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Entities a new item refers to, as resolved by the caller. `None` means the
/// referenced id does not exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateRefs<'a> {
    pub category: Option<&'a Category>,
    pub warehouse: Option<&'a Warehouse>,
    pub preferred_location: Option<&'a StorageLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeItem {
    /// Target slot. When absent the caller picks one before calling [`intake`].
    #[serde(default)]
    pub storage_location_id: Option<LocationId>,
    #[serde(default)]
    pub actual_condition: Option<Condition>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseItem {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveItem {
    pub new_storage_location_id: LocationId,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of editable fields. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub estimated_value: Option<Decimal>,
    #[serde(default)]
    pub planned_release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub condition: Option<Condition>,
}

impl UpdateItem {
    fn touches_owner_fields(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.photo_url.is_some()
            || self.estimated_value.is_some()
            || self.planned_release_date.is_some()
            || self.notes.is_some()
            || self.category_id.is_some()
    }
}

fn non_blank(field: &'static str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(field, "cannot be empty"));
    }
    Ok(value.to_string())
}

fn ensure_value(value: Option<Decimal>) -> DomainResult<()> {
    if value.is_some_and(|v| v.is_sign_negative()) {
        return Err(DomainError::validation("estimated_value", "cannot be negative"));
    }
    Ok(())
}

/// Guard a status change against the transition table in [`ItemStatus::can_transition_to`].
fn ensure_transition(item: &Item, next: ItemStatus, action: &str) -> DomainResult<()> {
    if item.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(wrong_status(item, action))
    }
}

fn ensure_status(item: &Item, allowed: &[ItemStatus], action: &str) -> DomainResult<()> {
    if allowed.contains(&item.status) {
        Ok(())
    } else {
        Err(wrong_status(item, action))
    }
}

fn wrong_status(item: &Item, action: &str) -> DomainError {
    DomainError::invalid_state(format!(
        "cannot {action} item {} while it is {}",
        item.unique_code, item.status
    ))
}

fn ensure_same_warehouse(item: &Item, location: &StorageLocation, field: &str) -> DomainResult<()> {
    if location.warehouse_id != item.warehouse_id {
        return Err(DomainError::validation(
            field,
            format!("storage location {} belongs to another warehouse", location.code),
        ));
    }
    Ok(())
}

/// Client submits a new item. The caller becomes its owner.
pub fn create(
    caller: &CallerContext,
    cmd: CreateItem,
    refs: CreateRefs<'_>,
    unique_code: UniqueCode,
    now: DateTime<Utc>,
) -> DomainResult<Transition> {
    if caller.role != Role::Client {
        return Err(DomainError::unauthorized("only clients submit items for storage"));
    }
    let name = non_blank("name", &cmd.name)?;
    ensure_value(cmd.estimated_value)?;

    let category = refs
        .category
        .filter(|c| c.id == cmd.category_id)
        .ok_or_else(|| DomainError::validation("category_id", "unknown category"))?;
    let warehouse = refs
        .warehouse
        .filter(|w| w.id == cmd.warehouse_id)
        .ok_or_else(|| DomainError::validation("warehouse_id", "unknown warehouse"))?;

    let preferred_location_id = match cmd.storage_location_id {
        None => None,
        Some(id) => {
            let location = refs
                .preferred_location
                .filter(|l| l.id == id)
                .ok_or_else(|| DomainError::validation("storage_location_id", "unknown storage location"))?;
            if location.warehouse_id != warehouse.id {
                return Err(DomainError::validation(
                    "storage_location_id",
                    "storage location belongs to another warehouse",
                ));
            }
            Some(id)
        }
    };

    let item = Item {
        id: ItemId::new(),
        unique_code,
        name,
        description: cmd.description,
        condition: cmd.condition.unwrap_or_default(),
        status: ItemStatus::PendingIntake,
        photo_url: cmd.photo_url,
        estimated_value: cmd.estimated_value,
        daily_storage_cost: Decimal::ZERO,
        intake_date: None,
        planned_release_date: cmd.planned_release_date,
        actual_release_date: None,
        notes: cmd.notes,
        owner_id: caller.id,
        category_id: category.id,
        warehouse_id: warehouse.id,
        storage_location_id: None,
        preferred_location_id,
        created_at: now,
        updated_at: now,
        version: 0,
    };

    let events = vec![ItemEvent::Created {
        item: ItemRef::from(&item),
        occurred_at: now,
    }];
    Ok(Transition::item_only(item, events))
}

/// Staff receives a pending item into `location`.
pub fn intake(
    caller: &CallerContext,
    item: &Item,
    location: &StorageLocation,
    cmd: IntakeItem,
    now: DateTime<Utc>,
) -> DomainResult<Transition> {
    require_staff(caller)?;
    ensure_transition(item, ItemStatus::Stored, "intake")?;
    ensure_same_warehouse(item, location, "storage_location_id")?;

    let mut location = location.clone();
    location.claim(now)?;

    let mut next = item.clone();
    let previous_condition = item.condition;
    if let Some(observed) = cmd.actual_condition {
        next.condition = observed;
    }
    next.status = ItemStatus::Stored;
    next.storage_location_id = Some(location.id);
    next.intake_date = Some(now);
    next.daily_storage_cost = location.daily_rate;
    next.updated_at = now;

    let mut description = format!("Item received into storage at {}", location.code);
    if next.condition != previous_condition {
        description.push_str(&format!(". Condition: {} → {}", previous_condition, next.condition));
    }

    let movement = MovementRecord::new(item.id, ActionType::Intake, description, caller.id, now)
        .with_locations(None, Some(location.id))
        .with_statuses(item.status, next.status)
        .with_conditions(previous_condition, next.condition)
        .with_notes(cmd.notes);

    let events = vec![ItemEvent::StatusChanged {
        item: ItemRef::from(&next),
        previous: item.status,
        new: next.status,
        location_code: Some(location.code.to_string()),
        occurred_at: now,
    }];

    Ok(Transition {
        item: next,
        locations: vec![location],
        movement: Some(movement),
        events,
    })
}

/// Owner asks for a stored item back. The item keeps its slot until released.
pub fn request_release(caller: &CallerContext, item: &Item, now: DateTime<Utc>) -> DomainResult<Transition> {
    require_owner(caller, item.owner_id)?;
    ensure_transition(item, ItemStatus::PendingRelease, "request release of")?;

    let mut next = item.clone();
    next.status = ItemStatus::PendingRelease;
    next.updated_at = now;

    let movement = MovementRecord::new(item.id, ActionType::StatusChange, "Owner requested release", caller.id, now)
        .with_statuses(item.status, next.status);

    let events = vec![ItemEvent::ReleaseRequested {
        item: ItemRef::from(&next),
        occurred_at: now,
    }];

    Ok(Transition {
        item: next,
        locations: Vec::new(),
        movement: Some(movement),
        events,
    })
}

/// Staff hands the item back to its owner and frees its slot.
///
/// `location` is the slot the item currently holds, if it still exists.
pub fn release(
    caller: &CallerContext,
    item: &Item,
    location: Option<&StorageLocation>,
    cmd: ReleaseItem,
    now: DateTime<Utc>,
) -> DomainResult<Transition> {
    require_staff(caller)?;
    ensure_transition(item, ItemStatus::Released, "release")?;

    let mut freed = Vec::new();
    if let Some(location) = location {
        if item.storage_location_id != Some(location.id) {
            return Err(DomainError::invalid_state(format!(
                "item {} is not held at {}",
                item.unique_code, location.code
            )));
        }
        let mut location = location.clone();
        location.release();
        freed.push(location);
    }

    let mut next = item.clone();
    next.status = ItemStatus::Released;
    next.storage_location_id = None;
    next.actual_release_date = Some(now);
    next.updated_at = now;

    let description = match freed.first() {
        Some(l) => format!("Item released to owner from {}", l.code),
        None => "Item released to owner".to_string(),
    };

    let movement = MovementRecord::new(item.id, ActionType::Release, description, caller.id, now)
        .with_locations(item.storage_location_id, None)
        .with_statuses(item.status, next.status)
        .with_notes(cmd.notes);

    let events = vec![ItemEvent::StatusChanged {
        item: ItemRef::from(&next),
        previous: item.status,
        new: next.status,
        location_code: None,
        occurred_at: now,
    }];

    Ok(Transition {
        item: next,
        locations: freed,
        movement: Some(movement),
        events,
    })
}

/// Staff moves a stored item from `from` to `to`.
pub fn move_item(
    caller: &CallerContext,
    item: &Item,
    from: &StorageLocation,
    to: &StorageLocation,
    cmd: MoveItem,
    now: DateTime<Utc>,
) -> DomainResult<Transition> {
    require_staff(caller)?;
    ensure_status(item, &[ItemStatus::Stored], "move")?;

    if item.storage_location_id != Some(from.id) {
        return Err(DomainError::invalid_state(format!(
            "item {} is not held at {}",
            item.unique_code, from.code
        )));
    }
    if to.id == from.id {
        return Err(DomainError::validation(
            "new_storage_location_id",
            "item is already at this storage location",
        ));
    }
    ensure_same_warehouse(item, to, "new_storage_location_id")?;

    let mut to = to.clone();
    to.claim(now)?;
    let mut from = from.clone();
    from.release();

    let mut next = item.clone();
    next.storage_location_id = Some(to.id);
    next.daily_storage_cost = to.daily_rate;
    next.updated_at = now;

    let movement = MovementRecord::new(
        item.id,
        ActionType::Move,
        format!("Item moved: {} → {}", from.code, to.code),
        caller.id,
        now,
    )
    .with_locations(Some(from.id), Some(to.id))
    .with_notes(cmd.notes);

    let events = vec![ItemEvent::Moved {
        item: ItemRef::from(&next),
        from_code: from.code.to_string(),
        to_code: to.code.to_string(),
        occurred_at: now,
    }];

    Ok(Transition {
        item: next,
        locations: vec![from, to],
        movement: Some(movement),
        events,
    })
}

/// Edit fields of an item.
///
/// Clients edit only their own items and only while pending intake, and may
/// not touch `condition`. Staff edit at any status, except that a released
/// item accepts nothing but a condition change. `category` is the resolved
/// category when the patch changes it.
pub fn update(
    caller: &CallerContext,
    item: &Item,
    patch: UpdateItem,
    category: Option<&Category>,
    now: DateTime<Utc>,
) -> DomainResult<Transition> {
    if caller.is_staff() {
        if item.status.is_terminal() && patch.touches_owner_fields() {
            return Err(DomainError::invalid_state(format!(
                "item {} is released; only its condition can change",
                item.unique_code
            )));
        }
    } else {
        require_owner(caller, item.owner_id)?;
        if patch.condition.is_some() {
            return Err(DomainError::unauthorized("only staff may change an item's condition"));
        }
        ensure_status(item, &[ItemStatus::PendingIntake], "edit")?;
    }

    ensure_value(patch.estimated_value)?;
    let mut next = item.clone();

    if let Some(name) = &patch.name {
        next.name = non_blank("name", name)?;
    }
    if let Some(category_id) = patch.category_id {
        let category = category
            .filter(|c| c.id == category_id)
            .ok_or_else(|| DomainError::validation("category_id", "unknown category"))?;
        next.category_id = category.id;
    }
    if patch.description.is_some() {
        next.description = patch.description;
    }
    if patch.photo_url.is_some() {
        next.photo_url = patch.photo_url;
    }
    if patch.estimated_value.is_some() {
        next.estimated_value = patch.estimated_value;
    }
    if patch.planned_release_date.is_some() {
        next.planned_release_date = patch.planned_release_date;
    }
    if patch.notes.is_some() {
        next.notes = patch.notes;
    }
    next.updated_at = now;

    let mut movement = None;
    let mut events = Vec::new();
    if let Some(condition) = patch.condition.filter(|c| *c != item.condition) {
        next.condition = condition;
        movement = Some(
            MovementRecord::new(
                item.id,
                ActionType::ConditionChange,
                format!("Condition changed: {} → {}", item.condition, condition),
                caller.id,
                now,
            )
            .with_conditions(item.condition, condition),
        );
        events.push(ItemEvent::ConditionChanged {
            item: ItemRef::from(&next),
            previous: item.condition,
            new: condition,
            occurred_at: now,
        });
    }

    Ok(Transition {
        item: next,
        locations: Vec::new(),
        movement,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostAccrual;
    use crate::location::{LocationSize, NewLocation};
    use chrono::Duration;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use stowage_core::UserId;

    struct Fixture {
        client: CallerContext,
        staff: CallerContext,
        warehouse: Warehouse,
        category: Category,
        l1: StorageLocation,
        l2: StorageLocation,
        now: DateTime<Utc>,
    }

    fn location(warehouse: WarehouseId, code: &str, rate: Decimal) -> StorageLocation {
        StorageLocation::register(
            NewLocation {
                code: code.to_string(),
                name: None,
                section: None,
                shelf: None,
                cell: None,
                size: Some(LocationSize::Medium),
                daily_rate: rate,
                warehouse_id: warehouse,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn fixture() -> Fixture {
        let now = Utc::now();
        let warehouse = Warehouse::new("Main", None, now).unwrap();
        let category = Category::new("Furniture", None).unwrap();
        Fixture {
            client: CallerContext::client(UserId::new()),
            staff: CallerContext::employee(UserId::new()),
            l1: location(warehouse.id, "A1-01", dec!(100)),
            l2: location(warehouse.id, "A1-02", dec!(150)),
            warehouse,
            category,
            now,
        }
    }

    fn create_cmd(f: &Fixture) -> CreateItem {
        CreateItem {
            name: "Sofa".to_string(),
            description: None,
            condition: None,
            category_id: f.category.id,
            warehouse_id: f.warehouse.id,
            storage_location_id: None,
            photo_url: None,
            estimated_value: None,
            planned_release_date: None,
            notes: None,
        }
    }

    fn refs(f: &Fixture) -> CreateRefs<'_> {
        CreateRefs {
            category: Some(&f.category),
            warehouse: Some(&f.warehouse),
            preferred_location: None,
        }
    }

    fn pending(f: &Fixture) -> Item {
        create(&f.client, create_cmd(f), refs(f), UniqueCode::generate(f.now), f.now)
            .unwrap()
            .item
    }

    #[test]
    fn create_starts_pending_without_location() {
        let f = fixture();
        let t = create(&f.client, create_cmd(&f), refs(&f), UniqueCode::generate(f.now), f.now).unwrap();
        assert_eq!(t.item.status, ItemStatus::PendingIntake);
        assert_eq!(t.item.owner_id, f.client.id);
        assert_eq!(t.item.condition, Condition::Good);
        assert_eq!(t.item.storage_location_id, None);
        assert!(t.movement.is_none());
        assert!(matches!(t.events[..], [ItemEvent::Created { .. }]));
        t.item.check_invariants().unwrap();
    }

    #[test]
    fn create_validates_name_and_references() {
        let f = fixture();
        let mut cmd = create_cmd(&f);
        cmd.name = "   ".to_string();
        let err = create(&f.client, cmd, refs(&f), UniqueCode::generate(f.now), f.now).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "name"));

        let missing = CreateRefs {
            category: None,
            ..refs(&f)
        };
        let err = create(&f.client, create_cmd(&f), missing, UniqueCode::generate(f.now), f.now).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "category_id"));
    }

    #[test]
    fn create_records_preferred_location_without_claiming() {
        let f = fixture();
        let mut cmd = create_cmd(&f);
        cmd.storage_location_id = Some(f.l1.id);
        let with_hint = CreateRefs {
            preferred_location: Some(&f.l1),
            ..refs(&f)
        };
        let t = create(&f.client, cmd, with_hint, UniqueCode::generate(f.now), f.now).unwrap();
        assert_eq!(t.item.preferred_location_id, Some(f.l1.id));
        assert_eq!(t.item.storage_location_id, None);
        assert!(t.locations.is_empty());
    }

    #[test]
    fn staff_cannot_create_items() {
        let f = fixture();
        let err = create(&f.staff, create_cmd(&f), refs(&f), UniqueCode::generate(f.now), f.now).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn intake_claims_location_and_copies_rate() {
        let f = fixture();
        let item = pending(&f);
        let t = intake(
            &f.staff,
            &item,
            &f.l1,
            IntakeItem {
                actual_condition: Some(Condition::Fair),
                ..Default::default()
            },
            f.now,
        )
        .unwrap();

        assert_eq!(t.item.status, ItemStatus::Stored);
        assert_eq!(t.item.storage_location_id, Some(f.l1.id));
        assert_eq!(t.item.daily_storage_cost, dec!(100));
        assert_eq!(t.item.condition, Condition::Fair);
        assert_eq!(t.item.intake_date, Some(f.now));
        assert!(t.locations[0].is_occupied);

        let m = t.movement.unwrap();
        assert_eq!(m.action_type, ActionType::Intake);
        assert_eq!(m.description, "Item received into storage at A1-01. Condition: good → fair");
        assert_eq!(m.to_location_id, Some(f.l1.id));
        assert_eq!(m.new_status, Some(ItemStatus::Stored));
    }

    #[test]
    fn client_cannot_intake_regardless_of_state() {
        let f = fixture();
        let mut item = pending(&f);
        for status in [ItemStatus::PendingIntake, ItemStatus::Released] {
            item.status = status;
            let err = intake(&f.client, &item, &f.l1, IntakeItem::default(), f.now).unwrap_err();
            assert!(matches!(err, DomainError::Unauthorized(_)));
        }
    }

    #[test]
    fn intake_into_occupied_location_conflicts() {
        let f = fixture();
        let mut taken = f.l1.clone();
        taken.is_occupied = true;
        let err = intake(&f.staff, &pending(&f), &taken, IntakeItem::default(), f.now).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn intake_of_already_stored_item_is_invalid() {
        let f = fixture();
        let stored = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap().item;
        let err = intake(&f.staff, &stored, &f.l2, IntakeItem::default(), f.now).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn intake_rejects_location_in_other_warehouse() {
        let f = fixture();
        let foreign = location(WarehouseId::new(), "Z9", dec!(1));
        let err = intake(&f.staff, &pending(&f), &foreign, IntakeItem::default(), f.now).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn request_release_is_owner_only_and_keeps_location() {
        let f = fixture();
        let stored = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap().item;

        assert!(matches!(
            request_release(&f.staff, &stored, f.now),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            request_release(&CallerContext::client(UserId::new()), &stored, f.now),
            Err(DomainError::Unauthorized(_))
        ));

        let t = request_release(&f.client, &stored, f.now).unwrap();
        assert_eq!(t.item.status, ItemStatus::PendingRelease);
        assert_eq!(t.item.storage_location_id, Some(f.l1.id));
        assert_eq!(t.movement.unwrap().action_type, ActionType::StatusChange);
        t.item.check_invariants().unwrap();
    }

    #[test]
    fn request_release_requires_stored() {
        let f = fixture();
        let err = request_release(&f.client, &pending(&f), f.now).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn release_twice_fails_with_invalid_state() {
        let f = fixture();
        let t = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap();
        let held = t.locations[0].clone();

        let released = release(&f.staff, &t.item, Some(&held), ReleaseItem::default(), f.now).unwrap();
        assert_eq!(released.item.status, ItemStatus::Released);
        assert_eq!(released.item.storage_location_id, None);
        assert!(!released.locations[0].is_occupied);
        assert_eq!(
            released.movement.as_ref().unwrap().description,
            "Item released to owner from A1-01"
        );

        let again = release(&f.staff, &released.item, None, ReleaseItem::default(), f.now).unwrap_err();
        assert!(matches!(again, DomainError::InvalidState(_)));
    }

    #[test]
    fn release_of_pending_intake_is_invalid() {
        let f = fixture();
        let err = release(&f.staff, &pending(&f), None, ReleaseItem::default(), f.now).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn move_swaps_occupancy_and_rate() {
        let f = fixture();
        let t = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap();
        let from = t.locations[0].clone();

        let cmd = MoveItem {
            new_storage_location_id: f.l2.id,
            notes: Some("rebalancing".to_string()),
        };
        let moved = move_item(&f.staff, &t.item, &from, &f.l2, cmd, f.now).unwrap();
        assert_eq!(moved.item.storage_location_id, Some(f.l2.id));
        assert_eq!(moved.item.daily_storage_cost, dec!(150));
        assert!(!moved.locations[0].is_occupied);
        assert!(moved.locations[1].is_occupied);
        assert_eq!(moved.movement.unwrap().description, "Item moved: A1-01 → A1-02");
    }

    #[test]
    fn move_to_same_location_is_rejected() {
        let f = fixture();
        let t = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap();
        let here = t.locations[0].clone();
        let cmd = MoveItem {
            new_storage_location_id: here.id,
            notes: None,
        };
        let err = move_item(&f.staff, &t.item, &here, &here, cmd, f.now).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn client_update_rules() {
        let f = fixture();
        let item = pending(&f);

        let renamed = update(
            &f.client,
            &item,
            UpdateItem {
                name: Some("Couch".to_string()),
                ..Default::default()
            },
            None,
            f.now,
        )
        .unwrap();
        assert_eq!(renamed.item.name, "Couch");
        assert!(renamed.movement.is_none());

        let err = update(
            &f.client,
            &item,
            UpdateItem {
                condition: Some(Condition::Poor),
                ..Default::default()
            },
            None,
            f.now,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let stranger = CallerContext::client(UserId::new());
        assert!(matches!(
            update(&stranger, &item, UpdateItem::default(), None, f.now),
            Err(DomainError::Unauthorized(_))
        ));

        let stored = intake(&f.staff, &item, &f.l1, IntakeItem::default(), f.now).unwrap().item;
        assert!(matches!(
            update(&f.client, &stored, UpdateItem::default(), None, f.now),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn staff_condition_change_is_recorded() {
        let f = fixture();
        let stored = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap().item;
        let t = update(
            &f.staff,
            &stored,
            UpdateItem {
                condition: Some(Condition::Damaged),
                ..Default::default()
            },
            None,
            f.now,
        )
        .unwrap();
        let m = t.movement.unwrap();
        assert_eq!(m.action_type, ActionType::ConditionChange);
        assert_eq!(m.description, "Condition changed: good → damaged");
        assert!(matches!(t.events[..], [ItemEvent::ConditionChanged { .. }]));

        let unchanged = update(
            &f.staff,
            &stored,
            UpdateItem {
                condition: Some(Condition::Good),
                ..Default::default()
            },
            None,
            f.now,
        )
        .unwrap();
        assert!(unchanged.movement.is_none());
    }

    #[test]
    fn released_items_only_accept_condition_changes() {
        let f = fixture();
        let t = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap();
        let released = release(&f.staff, &t.item, Some(&t.locations[0]), ReleaseItem::default(), f.now)
            .unwrap()
            .item;

        let err = update(
            &f.staff,
            &released,
            UpdateItem {
                notes: Some("late note".to_string()),
                ..Default::default()
            },
            None,
            f.now,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        assert!(update(
            &f.staff,
            &released,
            UpdateItem {
                condition: Some(Condition::Poor),
                ..Default::default()
            },
            None,
            f.now,
        )
        .is_ok());
    }

    #[test]
    fn update_rejects_unknown_category() {
        let f = fixture();
        let err = update(
            &f.client,
            &pending(&f),
            UpdateItem {
                category_id: Some(CategoryId::new()),
                ..Default::default()
            },
            None,
            f.now,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "category_id"));
    }

    #[test]
    fn full_scenario_accrues_and_releases() {
        let f = fixture();
        let stored = intake(&f.staff, &pending(&f), &f.l1, IntakeItem::default(), f.now).unwrap();
        let day10 = f.now + Duration::days(10);

        let accrual = CostAccrual::for_item(&stored.item, day10);
        assert_eq!(accrual.storage_days, 10);
        assert_eq!(accrual.total_storage_cost, dec!(1000));

        let requested = request_release(&f.client, &stored.item, day10).unwrap();
        let released = release(
            &f.staff,
            &requested.item,
            Some(&stored.locations[0]),
            ReleaseItem::default(),
            day10,
        )
        .unwrap();
        assert_eq!(released.item.status, ItemStatus::Released);
        assert!(!released.locations[0].is_occupied);

        let later = CostAccrual::for_item(&released.item, day10 + Duration::days(5));
        assert_eq!(later.storage_days, 10);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Intake(usize),
        RequestRelease,
        Release,
        Move(usize),
        Condition(Condition),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3).prop_map(Op::Intake),
            Just(Op::RequestRelease),
            Just(Op::Release),
            (0usize..3).prop_map(Op::Move),
            prop::sample::select(vec![Condition::New, Condition::Good, Condition::Damaged]).prop_map(Op::Condition),
        ]
    }

    proptest! {
        #[test]
        fn any_operation_sequence_preserves_invariants(ops in prop::collection::vec(arb_op(), 0..16)) {
            let f = fixture();
            let mut locations = vec![
                f.l1.clone(),
                f.l2.clone(),
                location(f.warehouse.id, "A1-03", dec!(80)),
            ];
            let mut item = pending(&f);
            let mut ledger = 0usize;

            for op in ops {
                let held = item
                    .storage_location_id
                    .and_then(|id| locations.iter().position(|l| l.id == id));
                let result = match op {
                    Op::Intake(i) => intake(&f.staff, &item, &locations[i], IntakeItem::default(), f.now),
                    Op::RequestRelease => request_release(&f.client, &item, f.now),
                    Op::Release => release(&f.staff, &item, held.map(|h| &locations[h]), ReleaseItem::default(), f.now),
                    Op::Move(i) => match held {
                        Some(h) => move_item(
                            &f.staff,
                            &item,
                            &locations[h],
                            &locations[i],
                            MoveItem { new_storage_location_id: locations[i].id, notes: None },
                            f.now,
                        ),
                        None => continue,
                    },
                    Op::Condition(c) => update(
                        &f.staff,
                        &item,
                        UpdateItem { condition: Some(c), ..Default::default() },
                        None,
                        f.now,
                    ),
                };

                if let Ok(t) = result {
                    ledger += usize::from(t.movement.is_some());
                    for changed in t.locations {
                        if let Some(slot) = locations.iter_mut().find(|l| l.id == changed.id) {
                            *slot = changed;
                        }
                    }
                    item = t.item;
                }

                prop_assert!(item.check_invariants().is_ok());
                let occupied: Vec<_> = locations.iter().filter(|l| l.is_occupied).map(|l| l.id).collect();
                match item.storage_location_id {
                    Some(id) => prop_assert_eq!(occupied, vec![id]),
                    None => prop_assert!(occupied.is_empty()),
                }
            }
            prop_assert!(ledger <= 16);
        }
    }
}
