use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use stowage_auth::{CallerContext, require_admin};
use stowage_inventory::{Category, Warehouse};

use super::{Clock, ServiceError, SystemClock};
use crate::store::InventoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWarehouse {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Reference data: warehouses and item categories.
pub struct DirectoryService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S> DirectoryService<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn create_warehouse(&self, caller: &CallerContext, input: NewWarehouse) -> Result<Warehouse, ServiceError> {
        require_admin(caller)?;
        let warehouse = Warehouse::new(&input.name, input.address, self.clock.now())?;
        self.store.insert_warehouse(warehouse.clone()).await?;
        info!(warehouse_id = %warehouse.id, name = %warehouse.name, "warehouse created");
        Ok(warehouse)
    }

    pub async fn warehouses(&self) -> Result<Vec<Warehouse>, ServiceError> {
        Ok(self.store.warehouses().await?)
    }

    pub async fn create_category(&self, caller: &CallerContext, input: NewCategory) -> Result<Category, ServiceError> {
        require_admin(caller)?;
        let category = Category::new(&input.name, input.icon)?;
        self.store.insert_category(category.clone()).await?;
        info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.store.categories().await?)
    }
}
