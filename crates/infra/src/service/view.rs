//! Read-side projection of an item.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stowage_inventory::{CostAccrual, Item, StorageLocation};

/// An item as returned to callers: the stored fields plus its current slot
/// code and cost accrued as of the read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub storage_location_code: Option<String>,
    pub storage_days: i64,
    pub total_storage_cost: Decimal,
}

impl ItemView {
    pub fn new(item: Item, location: Option<&StorageLocation>, now: DateTime<Utc>) -> Self {
        let accrual = CostAccrual::for_item(&item, now);
        Self {
            storage_location_code: location
                .filter(|l| item.storage_location_id == Some(l.id))
                .map(|l| l.code.to_string()),
            storage_days: accrual.storage_days,
            total_storage_cost: accrual.total_storage_cost,
            item,
        }
    }
}
