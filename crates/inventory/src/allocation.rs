//! Storage slot selection by size and price.
//!
//! Pure queries over a warehouse's locations. Nothing here claims a slot; the
//! intake transition does that against the chosen location.

use core::cmp::Ordering;

use chrono::{DateTime, Utc};

use stowage_core::{DomainError, DomainResult, WarehouseId};

use crate::location::{LocationSize, StorageLocation};

/// Size band scanned first when the caller gives no usable preference.
pub const DEFAULT_START: LocationSize = LocationSize::Medium;

/// Deterministic allocation order: cheapest first, then by physical address.
pub fn allocation_order(a: &StorageLocation, b: &StorageLocation) -> Ordering {
    a.daily_rate
        .cmp(&b.daily_rate)
        .then_with(|| a.section.cmp(&b.section))
        .then_with(|| a.shelf.cmp(&b.shelf))
        .then_with(|| a.cell.cmp(&b.cell))
        .then_with(|| a.code.as_str().cmp(b.code.as_str()))
}

/// Available locations in `warehouse_id`, optionally of exactly `size`,
/// in allocation order.
pub fn find_available<'a>(
    locations: &'a [StorageLocation],
    warehouse_id: WarehouseId,
    size: Option<LocationSize>,
    now: DateTime<Utc>,
) -> Vec<&'a StorageLocation> {
    let mut out: Vec<&StorageLocation> = locations
        .iter()
        .filter(|l| l.warehouse_id == warehouse_id)
        .filter(|l| size.is_none_or(|s| l.size == s))
        .filter(|l| l.is_available(now))
        .collect();
    out.sort_by(|a, b| allocation_order(a, b));
    out
}

/// Lenient parse of a size preference: unknown values mean "no preference".
pub fn parse_preference(raw: Option<&str>) -> Option<LocationSize> {
    raw.and_then(|s| s.parse().ok())
}

/// Pick the best free slot in a warehouse.
///
/// Scans size bands upward from `preferred` (or [`DEFAULT_START`]), never
/// downward, and takes the cheapest slot of the first band that has one. If
/// no band from the start upward has a free slot, falls back to the cheapest
/// free slot of any size.
pub fn suggest(
    locations: &[StorageLocation],
    warehouse_id: WarehouseId,
    preferred: Option<LocationSize>,
    now: DateTime<Utc>,
) -> DomainResult<StorageLocation> {
    let start = preferred.unwrap_or(DEFAULT_START).index();

    for size in &LocationSize::ORDER[start..] {
        if let Some(found) = find_available(locations, warehouse_id, Some(*size), now).first() {
            return Ok((*found).clone());
        }
    }

    find_available(locations, warehouse_id, None, now)
        .first()
        .map(|l| (*l).clone())
        .ok_or(DomainError::not_found("available storage location"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationStatus, NewLocation};
    use chrono::Duration;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn slot(warehouse: WarehouseId, code: &str, size: LocationSize, rate: Decimal) -> StorageLocation {
        let (section, rest) = code.split_at(1);
        StorageLocation::register(
            NewLocation {
                code: code.to_string(),
                name: None,
                section: Some(section.to_string()),
                shelf: Some(rest.to_string()),
                cell: Some("01".to_string()),
                size: Some(size),
                daily_rate: rate,
                warehouse_id: warehouse,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn cheapest_of_preferred_size_wins() {
        let w = WarehouseId::new();
        let locations = vec![
            slot(w, "A1", LocationSize::Small, dec!(150)),
            slot(w, "A2", LocationSize::Small, dec!(100)),
        ];
        let got = suggest(&locations, w, Some(LocationSize::Small), Utc::now()).unwrap();
        assert_eq!(got.daily_rate, dec!(100));
        assert_eq!(got.code.as_str(), "A2");
    }

    #[test]
    fn equal_rates_break_ties_by_address() {
        let w = WarehouseId::new();
        let locations = vec![
            slot(w, "B1", LocationSize::Medium, dec!(80)),
            slot(w, "A9", LocationSize::Medium, dec!(80)),
        ];
        let got = suggest(&locations, w, None, Utc::now()).unwrap();
        assert_eq!(got.code.as_str(), "A9");
    }

    #[test]
    fn scans_upward_from_preferred_size() {
        let w = WarehouseId::new();
        let locations = vec![
            slot(w, "A1", LocationSize::ExtraLarge, dec!(10)),
            slot(w, "A2", LocationSize::Large, dec!(500)),
        ];
        let got = suggest(&locations, w, Some(LocationSize::Medium), Utc::now()).unwrap();
        assert_eq!(got.code.as_str(), "A2");
    }

    #[test]
    fn falls_back_to_smaller_sizes_when_nothing_above() {
        let w = WarehouseId::new();
        let locations = vec![slot(w, "A1", LocationSize::Small, dec!(10))];
        let got = suggest(&locations, w, Some(LocationSize::Large), Utc::now()).unwrap();
        assert_eq!(got.code.as_str(), "A1");
    }

    #[test]
    fn no_preference_starts_at_medium() {
        let w = WarehouseId::new();
        let locations = vec![
            slot(w, "A1", LocationSize::Small, dec!(1)),
            slot(w, "A2", LocationSize::Medium, dec!(90)),
        ];
        let got = suggest(&locations, w, parse_preference(Some("gigantic")), Utc::now()).unwrap();
        assert_eq!(got.code.as_str(), "A2");
    }

    #[test]
    fn ignores_other_warehouses_and_unavailable_slots() {
        let w = WarehouseId::new();
        let now = Utc::now();

        let elsewhere = slot(WarehouseId::new(), "A1", LocationSize::Medium, dec!(1));
        let mut occupied = slot(w, "A2", LocationSize::Medium, dec!(2));
        occupied.claim(now).unwrap();
        let mut maintenance = slot(w, "A3", LocationSize::Medium, dec!(3));
        maintenance.status = LocationStatus::Maintenance;
        let mut reserved = slot(w, "A4", LocationSize::Medium, dec!(4));
        reserved.reserve(24, now).unwrap();

        let locations = vec![elsewhere, occupied, maintenance, reserved];
        assert_eq!(
            suggest(&locations, w, None, now),
            Err(DomainError::not_found("available storage location"))
        );
    }

    #[test]
    fn lapsed_reservation_is_allocatable() {
        let w = WarehouseId::new();
        let now = Utc::now();
        let mut reserved = slot(w, "A1", LocationSize::Medium, dec!(4));
        reserved.reserve(1, now).unwrap();

        let locations = vec![reserved];
        assert!(suggest(&locations, w, None, now).is_err());
        assert!(suggest(&locations, w, None, now + Duration::hours(2)).is_ok());
    }

    #[test]
    fn empty_warehouse_has_nothing_available() {
        let err = suggest(&[], WarehouseId::new(), Some(LocationSize::Small), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    fn arb_size() -> impl Strategy<Value = LocationSize> {
        prop::sample::select(LocationSize::ORDER.to_vec())
    }

    proptest! {
        #[test]
        fn suggestion_is_available_and_order_independent(
            specs in prop::collection::vec((arb_size(), 0u32..500, any::<bool>()), 0..24),
            preferred in prop::option::of(arb_size()),
        ) {
            let w = WarehouseId::new();
            let now = Utc::now();
            let mut locations: Vec<StorageLocation> = specs
                .iter()
                .enumerate()
                .map(|(i, (size, rate, occupied))| {
                    let mut l = slot(w, &format!("S{i:03}"), *size, Decimal::from(*rate));
                    if *occupied {
                        l.is_occupied = true;
                    }
                    l
                })
                .collect();

            let first = suggest(&locations, w, preferred, now);
            locations.reverse();
            let second = suggest(&locations, w, preferred, now);
            prop_assert_eq!(&first, &second);

            match first {
                Ok(chosen) => {
                    prop_assert!(chosen.is_available(now));
                    let start = preferred.unwrap_or(DEFAULT_START);
                    let band_has_any = locations
                        .iter()
                        .any(|l| l.is_available(now) && l.size >= start);
                    if band_has_any {
                        prop_assert!(chosen.size >= start);
                        let cheaper_same_band = locations.iter().any(|l| {
                            l.is_available(now) && l.size == chosen.size && l.daily_rate < chosen.daily_rate
                        });
                        prop_assert!(!cheaper_same_band);
                    }
                }
                Err(_) => prop_assert!(locations.iter().all(|l| !l.is_available(now))),
            }
        }
    }
}
