use core::str::FromStr;

use serde::Deserialize;

use stowage_core::DomainError;
use stowage_infra::store::{ItemFilter, LocationFilter, Pagination};
use stowage_inventory::{LocationSize, allocation};

/// Parse an optional query parameter, rejecting malformed values.
fn parse_opt<T>(raw: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::parse).transpose()
}

/// Path or query identifier.
pub fn parse_id<T>(raw: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    raw.trim().parse()
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub owner_id: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ItemListQuery {
    pub fn filter(&self) -> Result<ItemFilter, DomainError> {
        Ok(ItemFilter {
            owner_id: parse_opt(self.owner_id.as_deref())?,
            status: parse_opt(self.status.as_deref())?,
            category_id: parse_opt(self.category_id.as_deref())?,
            warehouse_id: parse_opt(self.warehouse_id.as_deref())?,
            search: self.search.clone(),
        })
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationListQuery {
    pub warehouse_id: Option<String>,
    pub size: Option<String>,
    #[serde(default)]
    pub available_only: bool,
}

impl LocationListQuery {
    pub fn filter(&self) -> Result<LocationFilter, DomainError> {
        Ok(LocationFilter {
            warehouse_id: parse_opt(self.warehouse_id.as_deref())?,
            size: parse_opt(self.size.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub warehouse_id: String,
    pub preferred_size: Option<String>,
}

impl SuggestQuery {
    /// An unrecognised size counts as no preference.
    pub fn preferred(&self) -> Option<LocationSize> {
        allocation::parse_preference(self.preferred_size.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReserveRequest {
    pub hours: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    pub warehouse_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_inventory::ItemStatus;

    #[test]
    fn blank_filters_are_ignored_and_bad_ones_rejected() {
        let query = ItemListQuery {
            status: Some("stored".to_string()),
            warehouse_id: Some("  ".to_string()),
            ..ItemListQuery::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.status, Some(ItemStatus::Stored));
        assert!(filter.warehouse_id.is_none());

        let bad = ItemListQuery {
            status: Some("lost".to_string()),
            ..ItemListQuery::default()
        };
        assert!(bad.filter().is_err());
    }

    #[test]
    fn unknown_size_preference_is_no_preference() {
        let query = SuggestQuery {
            warehouse_id: String::new(),
            preferred_size: Some("gigantic".to_string()),
        };
        assert_eq!(query.preferred(), None);
    }
}
