//! Item and location listing queries.
//!
//! Listings are paginated by default; filters are optional and combined with
//! AND.

use serde::{Deserialize, Serialize};

use stowage_core::{CategoryId, UserId, WarehouseId};
use stowage_inventory::{Item, ItemStatus, LocationSize, StorageLocation};

/// Page selection for listings (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl Pagination {
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(20).clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Filters for item listings. Results are ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    pub owner_id: Option<UserId>,
    pub status: Option<ItemStatus>,
    pub category_id: Option<CategoryId>,
    pub warehouse_id: Option<WarehouseId>,
    /// Case-insensitive match on name, unique code, or description.
    pub search: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        if self.owner_id.is_some_and(|o| o != item.owner_id)
            || self.status.is_some_and(|s| s != item.status)
            || self.category_id.is_some_and(|c| c != item.category_id)
            || self.warehouse_id.is_some_and(|w| w != item.warehouse_id)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                item.name.to_lowercase().contains(&needle)
                    || item.unique_code.as_str().to_lowercase().contains(&needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Filters for location listings. Results are ordered by section, shelf,
/// cell, then code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    pub warehouse_id: Option<WarehouseId>,
    pub size: Option<LocationSize>,
}

impl LocationFilter {
    pub fn in_warehouse(warehouse_id: WarehouseId) -> Self {
        Self {
            warehouse_id: Some(warehouse_id),
            size: None,
        }
    }

    pub fn matches(&self, location: &StorageLocation) -> bool {
        self.warehouse_id.is_none_or(|w| w == location.warehouse_id)
            && self.size.is_none_or(|s| s == location.size)
    }
}

pub(crate) fn address_order(a: &StorageLocation, b: &StorageLocation) -> core::cmp::Ordering {
    a.section
        .cmp(&b.section)
        .then_with(|| a.shelf.cmp(&b.shelf))
        .then_with(|| a.cell.cmp(&b.cell))
        .then_with(|| a.code.as_str().cmp(b.code.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        let p = Pagination::new(Some(0), Some(10_000));
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, Pagination::MAX_PAGE_SIZE);
        assert_eq!(Pagination::new(Some(3), Some(10)).offset(), 20);
    }
}
