//! Storage location registry rules.
//!
//! A `StorageLocation` is a physical slot. Its `is_occupied` flag is the single
//! exclusivity guard: it is set while an item is held in the slot and while
//! the slot is reserved. All occupancy changes go through the methods below so
//! that callers cannot half-apply them.

use core::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stowage_core::{AggregateRoot, DomainError, DomainResult, LocationId, ValueObject, WarehouseId};

/// Size class of a slot, ordered from smallest to largest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl LocationSize {
    /// Fixed allocation priority (small < medium < large < extra_large).
    pub const ORDER: [LocationSize; 4] = [
        LocationSize::Small,
        LocationSize::Medium,
        LocationSize::Large,
        LocationSize::ExtraLarge,
    ];

    pub fn index(self) -> usize {
        match self {
            LocationSize::Small => 0,
            LocationSize::Medium => 1,
            LocationSize::Large => 2,
            LocationSize::ExtraLarge => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSize::Small => "small",
            LocationSize::Medium => "medium",
            LocationSize::Large => "large",
            LocationSize::ExtraLarge => "extra_large",
        }
    }
}

impl FromStr for LocationSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(LocationSize::Small),
            "medium" => Ok(LocationSize::Medium),
            "large" => Ok(LocationSize::Large),
            "extra_large" | "xlarge" => Ok(LocationSize::ExtraLarge),
            other => Err(DomainError::validation("size", format!("unknown size '{other}'"))),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    Active,
    Maintenance,
    Reserved,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Active => "active",
            LocationStatus::Maintenance => "maintenance",
            LocationStatus::Reserved => "reserved",
        }
    }
}

impl FromStr for LocationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(LocationStatus::Active),
            "maintenance" => Ok(LocationStatus::Maintenance),
            "reserved" => Ok(LocationStatus::Reserved),
            other => Err(DomainError::validation("status", format!("unknown status '{other}'"))),
        }
    }
}

/// Human-legible slot code, e.g. `A1-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationCode(String);

impl LocationCode {
    pub const MAX_LEN: usize = 50;

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(DomainError::validation("code", "cannot be empty"));
        }
        if code.len() > Self::MAX_LEN {
            return Err(DomainError::validation("code", "must be at most 50 characters"));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for LocationCode {}

impl core::fmt::Display for LocationCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An addressable physical slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub id: LocationId,
    pub code: LocationCode,
    pub name: String,
    pub section: String,
    pub shelf: String,
    pub cell: String,
    pub size: LocationSize,
    pub daily_rate: Decimal,
    pub is_occupied: bool,
    pub status: LocationStatus,
    pub reserved_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub warehouse_id: WarehouseId,
    pub created_at: DateTime<Utc>,
    pub version: u64,
}

/// Input for registering a new slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocation {
    pub code: String,
    pub name: Option<String>,
    pub section: Option<String>,
    pub shelf: Option<String>,
    pub cell: Option<String>,
    pub size: Option<LocationSize>,
    pub daily_rate: Decimal,
    pub warehouse_id: WarehouseId,
}

/// Partial update of a slot's descriptive attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub size: Option<LocationSize>,
    pub daily_rate: Option<Decimal>,
    pub status: Option<LocationStatus>,
    pub is_active: Option<bool>,
}

fn ensure_rate(rate: Decimal) -> DomainResult<()> {
    if rate.is_sign_negative() {
        return Err(DomainError::validation("daily_rate", "cannot be negative"));
    }
    Ok(())
}

impl StorageLocation {
    pub fn register(input: NewLocation, now: DateTime<Utc>) -> DomainResult<Self> {
        let code = LocationCode::parse(&input.code)?;
        ensure_rate(input.daily_rate)?;

        Ok(Self {
            id: LocationId::new(),
            code,
            name: input.name.unwrap_or_default(),
            section: input.section.unwrap_or_default(),
            shelf: input.shelf.unwrap_or_default(),
            cell: input.cell.unwrap_or_default(),
            size: input.size.unwrap_or_default(),
            daily_rate: input.daily_rate,
            is_occupied: false,
            status: LocationStatus::Active,
            reserved_until: None,
            is_active: true,
            warehouse_id: input.warehouse_id,
            created_at: now,
            version: 0,
        })
    }

    /// A reservation whose `reserved_until` has passed. Expiry is checked
    /// lazily here; nothing sweeps lapsed reservations in the background.
    pub fn reservation_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == LocationStatus::Reserved
            && self.reserved_until.is_some_and(|until| until <= now)
    }

    /// Eligible for allocation: active, not under maintenance, and either
    /// unoccupied or held only by a lapsed reservation.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        match self.status {
            LocationStatus::Active => !self.is_occupied,
            LocationStatus::Reserved => self.reservation_lapsed(now),
            LocationStatus::Maintenance => false,
        }
    }

    /// Take exclusive occupancy for an item.
    pub fn claim(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active {
            return Err(DomainError::conflict(format!(
                "storage location {} is inactive",
                self.code
            )));
        }
        if self.status == LocationStatus::Maintenance {
            return Err(DomainError::conflict(format!(
                "storage location {} is under maintenance",
                self.code
            )));
        }
        if self.reservation_lapsed(now) {
            self.clear_reservation();
        }
        if self.is_occupied {
            return Err(DomainError::conflict(format!(
                "storage location {} is already occupied",
                self.code
            )));
        }
        self.is_occupied = true;
        Ok(())
    }

    /// Free the slot: clears occupancy and any reservation.
    pub fn release(&mut self) {
        self.is_occupied = false;
        self.clear_reservation();
    }

    /// Hold the slot for `hours` without an item.
    pub fn reserve(&mut self, hours: i64, now: DateTime<Utc>) -> DomainResult<()> {
        if hours <= 0 {
            return Err(DomainError::validation("hours", "must be positive"));
        }
        let until = Duration::try_hours(hours)
            .and_then(|span| now.checked_add_signed(span))
            .ok_or_else(|| DomainError::validation("hours", "too large"))?;
        if !self.is_active || self.status == LocationStatus::Maintenance {
            return Err(DomainError::conflict(format!(
                "storage location {} cannot be reserved",
                self.code
            )));
        }
        if self.reservation_lapsed(now) {
            self.clear_reservation();
        }
        if self.is_occupied {
            return Err(DomainError::conflict(format!(
                "storage location {} is already occupied or reserved",
                self.code
            )));
        }
        self.is_occupied = true;
        self.status = LocationStatus::Reserved;
        self.reserved_until = Some(until);
        Ok(())
    }

    /// Lift a reservation. `holds_item` says whether an item currently
    /// occupies the slot; such a slot cannot be unreserved.
    pub fn unreserve(&mut self, holds_item: bool) -> DomainResult<()> {
        if holds_item {
            return Err(DomainError::conflict(format!(
                "storage location {} is occupied by a stored item",
                self.code
            )));
        }
        self.release();
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: LocationPatch) -> DomainResult<()> {
        if let Some(rate) = patch.daily_rate {
            ensure_rate(rate)?;
        }
        if patch.status == Some(LocationStatus::Reserved) {
            return Err(DomainError::validation("status", "use reserve to reserve a location"));
        }
        if patch.status.is_some() && self.status == LocationStatus::Reserved {
            return Err(DomainError::invalid_state("unreserve the location before changing its status"));
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(rate) = patch.daily_rate {
            self.daily_rate = rate;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        Ok(())
    }

    /// Deletion guard: only slots that hold nothing may be removed.
    pub fn ensure_deletable(&self, holds_item: bool) -> DomainResult<()> {
        if holds_item || self.is_occupied {
            return Err(DomainError::conflict(format!(
                "storage location {} is occupied; move its item first",
                self.code
            )));
        }
        Ok(())
    }

    fn clear_reservation(&mut self) {
        if self.status == LocationStatus::Reserved {
            self.status = LocationStatus::Active;
            self.is_occupied = false;
        }
        self.reserved_until = None;
    }
}

impl AggregateRoot for StorageLocation {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
