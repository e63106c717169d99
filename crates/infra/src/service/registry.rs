use std::sync::Arc;

use tracing::{debug, info};

use stowage_auth::{CallerContext, require_admin, require_staff};
use stowage_core::{DomainError, ExpectedVersion, LocationId, WarehouseId};
use stowage_inventory::{LocationPatch, LocationSize, NewLocation, StorageLocation, allocation};

use super::{Clock, MAX_ATTEMPTS, ServiceError, SystemClock};
use crate::store::{ChangeSet, InventoryStore, LocationFilter, StoreError, UniqueKey};

/// Reservation length when the caller does not give one.
pub const DEFAULT_RESERVATION_HOURS: i64 = 24;

/// Storage location registry: CRUD, availability queries, reservations.
pub struct LocationRegistryService<S> {
    store: S,
    clock: Arc<dyn Clock>,
    default_reservation_hours: i64,
}

impl<S> LocationRegistryService<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            default_reservation_hours: DEFAULT_RESERVATION_HOURS,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_default_reservation_hours(mut self, hours: i64) -> Self {
        self.default_reservation_hours = hours;
        self
    }

    pub async fn create(&self, caller: &CallerContext, input: NewLocation) -> Result<StorageLocation, ServiceError> {
        require_staff(caller)?;
        if self.store.warehouse(input.warehouse_id).await?.is_none() {
            return Err(DomainError::validation("warehouse_id", "unknown warehouse").into());
        }

        let location = StorageLocation::register(input, self.clock.now())?;
        let code = location.code.clone();
        let committed = self
            .store
            .commit(ChangeSet::location(location))
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey(UniqueKey::LocationCode) => ServiceError::Domain(DomainError::conflict(
                    format!("storage location code {code} already exists"),
                )),
                other => other.into(),
            })?;
        let location = single(committed.locations)?;
        info!(location_id = %location.id, code = %location.code, performed_by = %caller.id, "storage location registered");
        Ok(location)
    }

    pub async fn update(
        &self,
        caller: &CallerContext,
        id: LocationId,
        patch: LocationPatch,
    ) -> Result<StorageLocation, ServiceError> {
        require_staff(caller)?;
        self.modify("update", caller, id, |location| location.apply_patch(patch.clone()))
            .await
    }

    /// Remove an empty location. Admin only.
    pub async fn delete(&self, caller: &CallerContext, id: LocationId) -> Result<(), ServiceError> {
        require_admin(caller)?;

        for attempt in 1..=MAX_ATTEMPTS {
            let location = self.load(id).await?;
            let holds_item = self.store.item_held_at(id).await?.is_some();
            location.ensure_deletable(holds_item)?;

            match self
                .store
                .delete_location(id, ExpectedVersion::of(location.version))
                .await
            {
                Ok(()) => {
                    info!(location_id = %id, code = %location.code, performed_by = %caller.id, "storage location deleted");
                    return Ok(());
                }
                Err(StoreError::VersionConflict(reason)) if attempt < MAX_ATTEMPTS => {
                    debug!(location_id = %id, attempt, %reason, "stale read, checking again");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(exhausted("delete"))
    }

    pub async fn get(&self, caller: &CallerContext, id: LocationId) -> Result<StorageLocation, ServiceError> {
        require_staff(caller)?;
        self.load(id).await
    }

    /// Locations matching `filter`. With `available_only`, only slots that
    /// could be allocated right now, in allocation order.
    pub async fn list(
        &self,
        caller: &CallerContext,
        filter: LocationFilter,
        available_only: bool,
    ) -> Result<Vec<StorageLocation>, ServiceError> {
        require_staff(caller)?;
        let mut locations = self.store.locations(&filter).await?;
        if available_only {
            let now = self.clock.now();
            locations.retain(|l| l.is_available(now));
            locations.sort_by(allocation::allocation_order);
        }
        Ok(locations)
    }

    /// Best free slot in `warehouse_id` for the given size preference.
    pub async fn suggest(
        &self,
        caller: &CallerContext,
        warehouse_id: WarehouseId,
        preferred: Option<LocationSize>,
    ) -> Result<StorageLocation, ServiceError> {
        require_staff(caller)?;
        if self.store.warehouse(warehouse_id).await?.is_none() {
            return Err(DomainError::not_found("warehouse").into());
        }
        let candidates = self.store.locations(&LocationFilter::in_warehouse(warehouse_id)).await?;
        Ok(allocation::suggest(&candidates, warehouse_id, preferred, self.clock.now())?)
    }

    pub async fn reserve(
        &self,
        caller: &CallerContext,
        id: LocationId,
        hours: Option<i64>,
    ) -> Result<StorageLocation, ServiceError> {
        require_staff(caller)?;
        let hours = hours.unwrap_or(self.default_reservation_hours);
        let now = self.clock.now();
        self.modify("reserve", caller, id, |location| location.reserve(hours, now))
            .await
    }

    pub async fn unreserve(&self, caller: &CallerContext, id: LocationId) -> Result<StorageLocation, ServiceError> {
        require_staff(caller)?;
        for attempt in 1..=MAX_ATTEMPTS {
            // Location before the occupancy check: an intake in between must
            // fail the version check on commit.
            let mut location = self.load(id).await?;
            let holds_item = self.store.item_held_at(id).await?.is_some();
            location.unreserve(holds_item)?;
            match self.store.commit(ChangeSet::location(location)).await {
                Ok(committed) => {
                    let location = single(committed.locations)?;
                    info!(location_id = %id, performed_by = %caller.id, "storage location unreserved");
                    return Ok(location);
                }
                Err(StoreError::VersionConflict(reason)) if attempt < MAX_ATTEMPTS => {
                    debug!(location_id = %id, attempt, holds_item, %reason, "stale read, deciding again");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(exhausted("unreserve"))
    }

    async fn load(&self, id: LocationId) -> Result<StorageLocation, ServiceError> {
        self.store
            .location(id)
            .await?
            .ok_or_else(|| DomainError::not_found("storage location").into())
    }

    /// Read, change, and write back one location, deciding again on a stale read.
    async fn modify<F>(
        &self,
        action: &'static str,
        caller: &CallerContext,
        id: LocationId,
        change: F,
    ) -> Result<StorageLocation, ServiceError>
    where
        F: Fn(&mut StorageLocation) -> Result<(), DomainError>,
    {
        for attempt in 1..=MAX_ATTEMPTS {
            let mut location = self.load(id).await?;
            change(&mut location).inspect_err(|error| {
                debug!(location_id = %id, action, code = error.code(), %error, "location change rejected");
            })?;

            match self.store.commit(ChangeSet::location(location)).await {
                Ok(committed) => {
                    let location = single(committed.locations)?;
                    info!(
                        location_id = %id,
                        action,
                        performed_by = %caller.id,
                        status = location.status.as_str(),
                        "storage location changed"
                    );
                    return Ok(location);
                }
                Err(StoreError::VersionConflict(reason)) if attempt < MAX_ATTEMPTS => {
                    debug!(location_id = %id, action, attempt, %reason, "stale read, deciding again");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(exhausted(action))
    }
}

fn single(mut locations: Vec<StorageLocation>) -> Result<StorageLocation, ServiceError> {
    locations
        .pop()
        .ok_or_else(|| StoreError::Backend("commit returned no location".to_string()).into())
}

fn exhausted(action: &str) -> ServiceError {
    ServiceError::Store(StoreError::VersionConflict(format!(
        "location {action} kept losing to concurrent writers"
    )))
}
