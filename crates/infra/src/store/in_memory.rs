use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stowage_core::{CategoryId, ExpectedVersion, ItemId, LocationId, WarehouseId};
use stowage_inventory::{Category, Item, MovementRecord, StorageLocation, Warehouse};

use super::query::{ItemFilter, LocationFilter, Page, Pagination, address_order};
use super::r#trait::{ChangeSet, Committed, InventoryStore, StoreError, UniqueKey};

#[derive(Debug, Default)]
struct State {
    items: HashMap<ItemId, Item>,
    locations: HashMap<LocationId, StorageLocation>,
    /// Append-only, in commit order.
    movements: Vec<MovementRecord>,
    warehouses: HashMap<WarehouseId, Warehouse>,
    categories: HashMap<CategoryId, Category>,
}

impl State {
    fn check(&self, changes: &ChangeSet) -> Result<(), StoreError> {
        for item in &changes.items {
            let expected = ExpectedVersion::of(item.version);
            let actual = self.items.get(&item.id).map(|i| i.version);
            if !expected.matches(actual) {
                return Err(StoreError::VersionConflict(format!(
                    "item {}: expected {expected:?}, found {actual:?}",
                    item.id
                )));
            }
            if expected == ExpectedVersion::New
                && self.items.values().any(|i| i.unique_code == item.unique_code)
            {
                return Err(StoreError::DuplicateKey(UniqueKey::ItemCode));
            }
        }

        for location in &changes.locations {
            let expected = ExpectedVersion::of(location.version);
            let actual = self.locations.get(&location.id).map(|l| l.version);
            if !expected.matches(actual) {
                return Err(StoreError::VersionConflict(format!(
                    "storage location {}: expected {expected:?}, found {actual:?}",
                    location.id
                )));
            }
            if self
                .locations
                .values()
                .any(|l| l.id != location.id && l.code == location.code)
            {
                return Err(StoreError::DuplicateKey(UniqueKey::LocationCode));
            }
        }
        Ok(())
    }
}

/// In-memory storage.
///
/// Intended for tests/dev. A single lock guards all state, so a commit's
/// version checks and writes happen as one step.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    state: RwLock<State>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    async fn items(&self, filter: &ItemFilter, page: Pagination) -> Result<Page<Item>, StoreError> {
        let state = self.read()?;
        let mut matching: Vec<&Item> = state.items.values().filter(|i| filter.matches(i)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(Page {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(page.offset())
                .take(page.limit())
                .cloned()
                .collect(),
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn item_held_at(&self, location_id: LocationId) -> Result<Option<Item>, StoreError> {
        Ok(self
            .read()?
            .items
            .values()
            .find(|i| i.storage_location_id == Some(location_id))
            .cloned())
    }

    async fn movements(&self, item_id: ItemId) -> Result<Vec<MovementRecord>, StoreError> {
        let state = self.read()?;
        // Reverse commit order first; the stable sort then keeps later commits
        // ahead of earlier ones that share a timestamp.
        let mut ledger: Vec<MovementRecord> = state
            .movements
            .iter()
            .rev()
            .filter(|m| m.item_id == item_id)
            .cloned()
            .collect();
        ledger.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ledger)
    }

    async fn location(&self, id: LocationId) -> Result<Option<StorageLocation>, StoreError> {
        Ok(self.read()?.locations.get(&id).cloned())
    }

    async fn locations(&self, filter: &LocationFilter) -> Result<Vec<StorageLocation>, StoreError> {
        let state = self.read()?;
        let mut out: Vec<StorageLocation> = state
            .locations
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        out.sort_by(address_order);
        Ok(out)
    }

    async fn delete_location(&self, id: LocationId, expected: ExpectedVersion) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let actual = state.locations.get(&id).map(|l| l.version);
        if !expected.matches(actual) {
            return Err(StoreError::VersionConflict(format!(
                "storage location {id}: expected {expected:?}, found {actual:?}"
            )));
        }
        state.locations.remove(&id);
        Ok(())
    }

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError> {
        Ok(self.read()?.warehouses.get(&id).cloned())
    }

    async fn warehouses(&self) -> Result<Vec<Warehouse>, StoreError> {
        let mut out: Vec<Warehouse> = self.read()?.warehouses.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError> {
        self.write()?.warehouses.insert(warehouse.id, warehouse);
        Ok(())
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut out: Vec<Category> = self.read()?.categories.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        self.write()?.categories.insert(category.id, category);
        Ok(())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<Committed, StoreError> {
        let mut state = self.write()?;
        state.check(&changes)?;

        let mut committed = Committed::default();
        for mut item in changes.items {
            item.version = ExpectedVersion::of(item.version).next();
            state.items.insert(item.id, item.clone());
            committed.items.push(item);
        }
        for mut location in changes.locations {
            location.version = ExpectedVersion::of(location.version).next();
            state.locations.insert(location.id, location.clone());
            committed.locations.push(location);
        }
        state.movements.extend(changes.movements);

        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use stowage_inventory::{LocationSize, NewLocation};

    fn location(code: &str) -> StorageLocation {
        StorageLocation::register(
            NewLocation {
                code: code.to_string(),
                name: None,
                section: None,
                shelf: None,
                cell: None,
                size: Some(LocationSize::Small),
                daily_rate: Decimal::ONE,
                warehouse_id: WarehouseId::new(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn commit_bumps_versions() {
        let store = InMemoryInventoryStore::new();
        let committed = store.commit(ChangeSet::location(location("A1"))).await.unwrap();
        assert_eq!(committed.locations[0].version, 1);

        let mut loc = committed.locations[0].clone();
        loc.name = "renamed".to_string();
        let again = store.commit(ChangeSet::location(loc)).await.unwrap();
        assert_eq!(again.locations[0].version, 2);
    }

    #[tokio::test]
    async fn stale_write_is_rejected_and_nothing_applies() {
        let store = InMemoryInventoryStore::new();
        let a = store.commit(ChangeSet::location(location("A1"))).await.unwrap().locations[0].clone();
        let b = store.commit(ChangeSet::location(location("A2"))).await.unwrap().locations[0].clone();

        let mut fresh_b = b.clone();
        fresh_b.name = "fresh".to_string();
        store.commit(ChangeSet::location(fresh_b)).await.unwrap();

        let mut a2 = a.clone();
        a2.is_occupied = true;
        let mut stale_b = b.clone();
        stale_b.is_occupied = true;
        let err = store
            .commit(ChangeSet {
                locations: vec![a2, stale_b],
                ..ChangeSet::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict(_)));

        let a_now = store.location(a.id).await.unwrap().unwrap();
        assert!(!a_now.is_occupied);
        assert_eq!(a_now.version, 1);
    }

    #[tokio::test]
    async fn duplicate_location_code_is_rejected() {
        let store = InMemoryInventoryStore::new();
        store.commit(ChangeSet::location(location("A1"))).await.unwrap();
        let err = store.commit(ChangeSet::location(location("A1"))).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateKey(UniqueKey::LocationCode));
    }

    #[tokio::test]
    async fn delete_requires_current_version() {
        let store = InMemoryInventoryStore::new();
        let loc = store.commit(ChangeSet::location(location("A1"))).await.unwrap().locations[0].clone();
        assert!(store.delete_location(loc.id, ExpectedVersion::Exact(7)).await.is_err());
        store.delete_location(loc.id, ExpectedVersion::of(loc.version)).await.unwrap();
        assert!(store.location(loc.id).await.unwrap().is_none());
    }
}
