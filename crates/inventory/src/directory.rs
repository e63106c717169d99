//! Warehouses and categories referenced by items and locations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stowage_core::{CategoryId, DomainError, DomainResult, Entity, WarehouseId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Warehouse {
    pub fn new(name: &str, address: Option<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        Ok(Self {
            id: WarehouseId::new(),
            name: name.to_string(),
            address,
            is_active: true,
            created_at: now,
        })
    }
}

impl Entity for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: Option<String>,
}

impl Category {
    pub fn new(name: &str, icon: Option<String>) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        Ok(Self {
            id: CategoryId::new(),
            name: name.to_string(),
            icon,
        })
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        let w = Warehouse::new("  North  ", None, Utc::now()).unwrap();
        assert_eq!(w.name, "North");
        assert!(w.is_active);
        assert!(Warehouse::new(" ", None, Utc::now()).is_err());
        assert!(Category::new("", None).is_err());
    }
}
