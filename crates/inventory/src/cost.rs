//! Storage cost accrual, derived on every read.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Whole days elapsed since intake. Zero when not yet stored or when the
/// clock reads earlier than the intake date.
pub fn storage_days(intake_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match intake_date {
        Some(intake) => (now - intake).num_days().max(0),
        None => 0,
    }
}

pub fn total_cost(days: i64, daily_rate: Decimal) -> Decimal {
    Decimal::from(days) * daily_rate
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostAccrual {
    pub storage_days: i64,
    pub total_storage_cost: Decimal,
}

impl CostAccrual {
    /// Accrual for `item` as of `now`. Released items stop accruing at their
    /// release date.
    pub fn for_item(item: &Item, now: DateTime<Utc>) -> Self {
        let until = item.actual_release_date.map_or(now, |released| released.min(now));
        let days = storage_days(item.intake_date, until);
        Self {
            storage_days: days,
            total_storage_cost: total_cost(days, item.daily_storage_cost),
        }
    }
}
