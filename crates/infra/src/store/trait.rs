use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stowage_core::{CategoryId, ExpectedVersion, ItemId, LocationId, WarehouseId};
use stowage_inventory::{Category, Item, MovementRecord, StorageLocation, Transition, Warehouse};

use super::query::{ItemFilter, LocationFilter, Page, Pagination};

/// Storage operation error.
///
/// These are **infrastructure errors** as opposed to domain errors
/// (validation, ownership, illegal transitions).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage failed (connection, lock poisoning, bad row data).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// An entity changed between being read and being written back.
    #[error("optimistic concurrency check failed: {0}")]
    VersionConflict(String),

    /// A unique key is already taken.
    #[error("duplicate key: {0}")]
    DuplicateKey(UniqueKey),
}

/// Unique constraints enforced by every store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniqueKey {
    ItemCode,
    LocationCode,
}

impl core::fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UniqueKey::ItemCode => f.write_str("item unique code"),
            UniqueKey::LocationCode => f.write_str("storage location code"),
        }
    }
}

/// One atomic unit of work.
///
/// Every item and location carries the version it was read at (`0` for new
/// entities). A commit applies all writes and ledger appends only if every
/// written entity is still at that version; otherwise nothing is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub items: Vec<Item>,
    pub locations: Vec<StorageLocation>,
    pub movements: Vec<MovementRecord>,
}

impl ChangeSet {
    pub fn location(location: StorageLocation) -> Self {
        Self {
            locations: vec![location],
            ..Self::default()
        }
    }
}

impl From<&Transition> for ChangeSet {
    fn from(t: &Transition) -> Self {
        Self {
            items: vec![t.item.clone()],
            locations: t.locations.clone(),
            movements: t.movement.iter().cloned().collect(),
        }
    }
}

/// Entities as persisted by a commit, carrying their new versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Committed {
    pub items: Vec<Item>,
    pub locations: Vec<StorageLocation>,
}

/// Persistence port for the storage domain.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - apply a [`ChangeSet`] atomically (all writes and appends, or none)
/// - compare-and-swap every written entity on its version
/// - reject duplicate item unique codes and location codes
/// - never update or delete movement records
/// - return an item's movements newest first, in commit order for ties
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    async fn items(&self, filter: &ItemFilter, page: Pagination) -> Result<Page<Item>, StoreError>;

    /// The item currently holding `location_id`, if any.
    async fn item_held_at(&self, location_id: LocationId) -> Result<Option<Item>, StoreError>;

    async fn movements(&self, item_id: ItemId) -> Result<Vec<MovementRecord>, StoreError>;

    async fn location(&self, id: LocationId) -> Result<Option<StorageLocation>, StoreError>;

    async fn locations(&self, filter: &LocationFilter) -> Result<Vec<StorageLocation>, StoreError>;

    /// Remove a location that was read at `expected`.
    async fn delete_location(&self, id: LocationId, expected: ExpectedVersion) -> Result<(), StoreError>;

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError>;

    async fn warehouses(&self) -> Result<Vec<Warehouse>, StoreError>;

    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError>;

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn insert_category(&self, category: Category) -> Result<(), StoreError>;

    async fn commit(&self, changes: ChangeSet) -> Result<Committed, StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        (**self).item(id).await
    }

    async fn items(&self, filter: &ItemFilter, page: Pagination) -> Result<Page<Item>, StoreError> {
        (**self).items(filter, page).await
    }

    async fn item_held_at(&self, location_id: LocationId) -> Result<Option<Item>, StoreError> {
        (**self).item_held_at(location_id).await
    }

    async fn movements(&self, item_id: ItemId) -> Result<Vec<MovementRecord>, StoreError> {
        (**self).movements(item_id).await
    }

    async fn location(&self, id: LocationId) -> Result<Option<StorageLocation>, StoreError> {
        (**self).location(id).await
    }

    async fn locations(&self, filter: &LocationFilter) -> Result<Vec<StorageLocation>, StoreError> {
        (**self).locations(filter).await
    }

    async fn delete_location(&self, id: LocationId, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).delete_location(id, expected).await
    }

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError> {
        (**self).warehouse(id).await
    }

    async fn warehouses(&self) -> Result<Vec<Warehouse>, StoreError> {
        (**self).warehouses().await
    }

    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError> {
        (**self).insert_warehouse(warehouse).await
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        (**self).category(id).await
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).categories().await
    }

    async fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        (**self).insert_category(category).await
    }

    async fn commit(&self, changes: ChangeSet) -> Result<Committed, StoreError> {
        (**self).commit(changes).await
    }
}
