use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use stowage_auth::{CallerContext, require_owner_or_staff, require_staff};
use stowage_core::{DomainError, ItemId, LocationId};
use stowage_events::NotificationDispatcher;
use stowage_inventory::{
    CreateItem, CreateRefs, IntakeItem, Item, MoveItem, MovementRecord, ReleaseItem, StorageLocation,
    Transition, UniqueCode, UpdateItem, allocation, lifecycle,
};

use super::view::ItemView;
use super::{Clock, MAX_ATTEMPTS, ServiceError, SystemClock};
use crate::store::{ChangeSet, InventoryStore, ItemFilter, LocationFilter, Page, Pagination, StoreError, UniqueKey};

/// Runs item lifecycle operations against a store.
pub struct ItemLifecycleService<S> {
    store: S,
    notifier: NotificationDispatcher,
    clock: Arc<dyn Clock>,
}

impl<S> ItemLifecycleService<S>
where
    S: InventoryStore,
{
    pub fn new(store: S, notifier: NotificationDispatcher) -> Self {
        Self {
            store,
            notifier,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn create(&self, caller: &CallerContext, cmd: CreateItem) -> Result<Item, ServiceError> {
        let category = self.store.category(cmd.category_id).await?;
        let warehouse = self.store.warehouse(cmd.warehouse_id).await?;
        let preferred = match cmd.storage_location_id {
            Some(id) => self.store.location(id).await?,
            None => None,
        };
        let refs = CreateRefs {
            category: category.as_ref(),
            warehouse: warehouse.as_ref(),
            preferred_location: preferred.as_ref(),
        };

        for attempt in 1..=MAX_ATTEMPTS {
            let now = self.clock.now();
            let transition = lifecycle::create(caller, cmd.clone(), refs, UniqueCode::generate(now), now)
                .map_err(|e| rejected("create", None, e))?;
            if let Some(item) = self.commit("create", caller, transition, attempt).await? {
                return Ok(item);
            }
        }
        Err(exhausted("create"))
    }

    pub async fn intake(
        &self,
        caller: &CallerContext,
        item_id: ItemId,
        cmd: IntakeItem,
    ) -> Result<Item, ServiceError> {
        require_staff(caller).map_err(|e| rejected("intake", Some(item_id), e.into()))?;

        for attempt in 1..=MAX_ATTEMPTS {
            let now = self.clock.now();
            let item = self.load_item(item_id).await?;
            let location = self
                .intake_location(&item, cmd.storage_location_id, now)
                .await
                .map_err(|e| rejected_service("intake", item_id, e))?;

            let transition = lifecycle::intake(caller, &item, &location, cmd.clone(), now)
                .map_err(|e| rejected("intake", Some(item_id), e))?;
            if let Some(item) = self.commit("intake", caller, transition, attempt).await? {
                return Ok(item);
            }
        }
        Err(exhausted("intake"))
    }

    pub async fn request_release(&self, caller: &CallerContext, item_id: ItemId) -> Result<Item, ServiceError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let now = self.clock.now();
            let item = self.load_item(item_id).await?;
            let transition = lifecycle::request_release(caller, &item, now)
                .map_err(|e| rejected("request_release", Some(item_id), e))?;
            if let Some(item) = self.commit("request_release", caller, transition, attempt).await? {
                return Ok(item);
            }
        }
        Err(exhausted("request_release"))
    }

    pub async fn release(
        &self,
        caller: &CallerContext,
        item_id: ItemId,
        cmd: ReleaseItem,
    ) -> Result<Item, ServiceError> {
        require_staff(caller).map_err(|e| rejected("release", Some(item_id), e.into()))?;

        for attempt in 1..=MAX_ATTEMPTS {
            let now = self.clock.now();
            let item = self.load_item(item_id).await?;
            let held = match item.storage_location_id {
                Some(id) => self.store.location(id).await?,
                None => None,
            };
            let transition = lifecycle::release(caller, &item, held.as_ref(), cmd.clone(), now)
                .map_err(|e| rejected("release", Some(item_id), e))?;
            if let Some(item) = self.commit("release", caller, transition, attempt).await? {
                return Ok(item);
            }
        }
        Err(exhausted("release"))
    }

    pub async fn move_item(&self, caller: &CallerContext, item_id: ItemId, cmd: MoveItem) -> Result<Item, ServiceError> {
        require_staff(caller).map_err(|e| rejected("move", Some(item_id), e.into()))?;

        for attempt in 1..=MAX_ATTEMPTS {
            let now = self.clock.now();
            let item = self.load_item(item_id).await?;
            let Some(from_id) = item.storage_location_id else {
                return Err(rejected(
                    "move",
                    Some(item_id),
                    DomainError::invalid_state(format!(
                        "cannot move item {} while it is {}",
                        item.unique_code, item.status
                    )),
                ));
            };
            let from = self.load_location(from_id).await?;
            let to = self.load_location(cmd.new_storage_location_id).await?;

            let transition = lifecycle::move_item(caller, &item, &from, &to, cmd.clone(), now)
                .map_err(|e| rejected("move", Some(item_id), e))?;
            if let Some(item) = self.commit("move", caller, transition, attempt).await? {
                return Ok(item);
            }
        }
        Err(exhausted("move"))
    }

    pub async fn update(&self, caller: &CallerContext, item_id: ItemId, patch: UpdateItem) -> Result<Item, ServiceError> {
        let category = match patch.category_id {
            Some(id) => self.store.category(id).await?,
            None => None,
        };

        for attempt in 1..=MAX_ATTEMPTS {
            let now = self.clock.now();
            let item = self.load_item(item_id).await?;
            let transition = lifecycle::update(caller, &item, patch.clone(), category.as_ref(), now)
                .map_err(|e| rejected("update", Some(item_id), e))?;
            if let Some(item) = self.commit("update", caller, transition, attempt).await? {
                return Ok(item);
            }
        }
        Err(exhausted("update"))
    }

    /// An item visible to `caller`: clients see only their own.
    pub async fn get(&self, caller: &CallerContext, item_id: ItemId) -> Result<Item, ServiceError> {
        let item = self.load_item(item_id).await?;
        require_owner_or_staff(caller, item.owner_id)?;
        Ok(item)
    }

    /// Ledger of an item, newest first.
    pub async fn history(&self, caller: &CallerContext, item_id: ItemId) -> Result<Vec<MovementRecord>, ServiceError> {
        let item = self.get(caller, item_id).await?;
        Ok(self.store.movements(item.id).await?)
    }

    /// The caller's own items.
    pub async fn list_mine(
        &self,
        caller: &CallerContext,
        mut filter: ItemFilter,
        page: Pagination,
    ) -> Result<Page<Item>, ServiceError> {
        filter.owner_id = Some(caller.id);
        Ok(self.store.items(&filter, page).await?)
    }

    /// Every item matching `filter`. Staff only.
    pub async fn list(
        &self,
        caller: &CallerContext,
        filter: ItemFilter,
        page: Pagination,
    ) -> Result<Page<Item>, ServiceError> {
        require_staff(caller)?;
        Ok(self.store.items(&filter, page).await?)
    }

    /// Project an item for callers, with cost accrued as of now.
    pub async fn view(&self, item: Item) -> Result<ItemView, ServiceError> {
        let location = match item.storage_location_id {
            Some(id) => self.store.location(id).await?,
            None => None,
        };
        Ok(ItemView::new(item, location.as_ref(), self.clock.now()))
    }

    pub async fn view_page(&self, page: Page<Item>) -> Result<Page<ItemView>, ServiceError> {
        let mut views = Vec::with_capacity(page.items.len());
        for item in page.items.iter().cloned() {
            views.push(self.view(item).await?);
        }
        Ok(Page {
            items: views,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn load_item(&self, id: ItemId) -> Result<Item, ServiceError> {
        self.store
            .item(id)
            .await?
            .ok_or_else(|| DomainError::not_found("item").into())
    }

    async fn load_location(&self, id: LocationId) -> Result<StorageLocation, ServiceError> {
        self.store
            .location(id)
            .await?
            .ok_or_else(|| DomainError::not_found("storage location").into())
    }

    /// Slot for an intake: the explicit one, else the owner's preferred slot
    /// while it is free, else whatever the allocation strategy picks.
    async fn intake_location(
        &self,
        item: &Item,
        explicit: Option<LocationId>,
        now: DateTime<Utc>,
    ) -> Result<StorageLocation, ServiceError> {
        if let Some(id) = explicit {
            return self.load_location(id).await;
        }

        if let Some(id) = item.preferred_location_id {
            if let Some(preferred) = self.store.location(id).await? {
                if preferred.warehouse_id == item.warehouse_id && preferred.is_available(now) {
                    return Ok(preferred);
                }
            }
        }

        let candidates = self
            .store
            .locations(&LocationFilter::in_warehouse(item.warehouse_id))
            .await?;
        Ok(allocation::suggest(&candidates, item.warehouse_id, None, now)?)
    }

    /// Persist a decided transition.
    ///
    /// Returns `Ok(None)` when the transition was decided on stale state (or
    /// minted a tracking code that is already taken) and another attempt is
    /// allowed.
    async fn commit(
        &self,
        action: &'static str,
        caller: &CallerContext,
        transition: Transition,
        attempt: usize,
    ) -> Result<Option<Item>, ServiceError> {
        match self.store.commit(ChangeSet::from(&transition)).await {
            Ok(committed) => {
                let item = committed
                    .items
                    .into_iter()
                    .next()
                    .ok_or_else(|| StoreError::Backend("commit returned no item".to_string()))?;
                info!(
                    item_id = %item.id,
                    action,
                    performed_by = %caller.id,
                    status = %item.status,
                    "item transition committed"
                );
                let delivered = self.notifier.dispatch(transition.notifications());
                debug!(item_id = %item.id, action, delivered, "notifications dispatched");
                Ok(Some(item))
            }
            Err(StoreError::VersionConflict(reason)) if attempt < MAX_ATTEMPTS => {
                debug!(item_id = %transition.item.id, action, attempt, %reason, "stale read, deciding again");
                Ok(None)
            }
            Err(StoreError::DuplicateKey(UniqueKey::ItemCode)) if attempt < MAX_ATTEMPTS => {
                debug!(action, attempt, "tracking code collision, minting another");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn rejected(action: &'static str, item_id: Option<ItemId>, error: DomainError) -> ServiceError {
    debug!(action, item_id = ?item_id, code = error.code(), %error, "transition rejected");
    ServiceError::Domain(error)
}

fn rejected_service(action: &'static str, item_id: ItemId, error: ServiceError) -> ServiceError {
    match error {
        ServiceError::Domain(e) => rejected(action, Some(item_id), e),
        other => other,
    }
}

fn exhausted(action: &'static str) -> ServiceError {
    ServiceError::Store(StoreError::VersionConflict(format!(
        "{action} kept losing to concurrent writers"
    )))
}
