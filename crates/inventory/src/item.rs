//! The `Item` entity, its status/condition enums, and tracking codes.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stowage_core::{
    AggregateRoot, CategoryId, DomainError, DomainResult, ItemId, LocationId, UserId, ValueObject,
    WarehouseId,
};

/// Lifecycle status of an item.
///
/// `pending_intake -> stored -> pending_release -> released`, with
/// `stored -> released` allowed directly and `stored -> stored` for moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    PendingIntake,
    Stored,
    PendingRelease,
    Released,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::PendingIntake => "pending_intake",
            ItemStatus::Stored => "stored",
            ItemStatus::PendingRelease => "pending_release",
            ItemStatus::Released => "released",
        }
    }

    /// Statuses in which the item physically sits in a storage location.
    ///
    /// A release request does not move the item, so `pending_release` keeps
    /// its location until the release itself.
    pub fn holds_location(&self) -> bool {
        matches!(self, ItemStatus::Stored | ItemStatus::PendingRelease)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Released)
    }

    /// Status changes the lifecycle allows. Moves keep the status and are not
    /// listed.
    pub fn can_transition_to(&self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        matches!(
            (self, next),
            (PendingIntake, Stored)
                | (Stored, PendingRelease)
                | (Stored, Released)
                | (PendingRelease, Released)
        )
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending_intake" => Ok(ItemStatus::PendingIntake),
            "stored" => Ok(ItemStatus::Stored),
            "pending_release" => Ok(ItemStatus::PendingRelease),
            "released" => Ok(ItemStatus::Released),
            other => Err(DomainError::validation("status", format!("unknown status '{other}'"))),
        }
    }
}

/// Physical condition as observed by the owner or staff.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    #[default]
    Good,
    Fair,
    Poor,
    Damaged,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
            Condition::Damaged => "damaged",
        }
    }
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Condition::New),
            "good" => Ok(Condition::Good),
            "fair" => Ok(Condition::Fair),
            "poor" => Ok(Condition::Poor),
            "damaged" => Ok(Condition::Damaged),
            other => Err(DomainError::validation(
                "condition",
                format!("unknown condition '{other}'"),
            )),
        }
    }
}

/// Human-legible tracking code: `ITM-YYYYMMDD-XXXXXXXX`.
///
/// The suffix is 8 upper-case hex digits taken from a random UUID, so codes
/// can be minted without coordination. The store still rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueCode(String);

impl UniqueCode {
    const PREFIX: &'static str = "ITM";

    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        Self(format!("{}-{}-{}", Self::PREFIX, now.format("%Y%m%d"), suffix))
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let invalid = || DomainError::validation("unique_code", format!("malformed code '{raw}'"));

        let mut parts = raw.split('-');
        let (Some(prefix), Some(date), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if prefix != Self::PREFIX
            || date.len() != 8
            || !date.bytes().all(|b| b.is_ascii_digit())
            || suffix.len() != 8
            || !suffix.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
        {
            return Err(invalid());
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for UniqueCode {}

impl core::fmt::Display for UniqueCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical object submitted for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub unique_code: UniqueCode,
    pub name: String,
    pub description: Option<String>,
    pub condition: Condition,
    pub status: ItemStatus,
    pub photo_url: Option<String>,
    pub estimated_value: Option<Decimal>,
    /// Copied from the location's rate at intake or move; never live-linked.
    pub daily_storage_cost: Decimal,
    pub intake_date: Option<DateTime<Utc>>,
    pub planned_release_date: Option<DateTime<Utc>>,
    pub actual_release_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub owner_id: UserId,
    pub category_id: CategoryId,
    pub warehouse_id: WarehouseId,
    pub storage_location_id: Option<LocationId>,
    /// Slot the owner asked for at submission. A hint only; never claimed.
    pub preferred_location_id: Option<LocationId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Item {
    /// Structural invariants that every persisted item satisfies.
    pub fn check_invariants(&self) -> DomainResult<()> {
        if self.status.holds_location() != self.storage_location_id.is_some() {
            return Err(DomainError::invalid_state(format!(
                "item {} is {} but storage location is {}",
                self.unique_code,
                self.status,
                if self.storage_location_id.is_some() { "set" } else { "empty" }
            )));
        }
        if self.status != ItemStatus::PendingIntake && self.intake_date.is_none() {
            return Err(DomainError::invalid_state(format!(
                "item {} has no intake date",
                self.unique_code
            )));
        }
        if (self.status == ItemStatus::Released) != self.actual_release_date.is_some() {
            return Err(DomainError::invalid_state(format!(
                "item {} release date does not match its status",
                self.unique_code
            )));
        }
        if self.daily_storage_cost.is_sign_negative() {
            return Err(DomainError::invalid_state("daily storage cost is negative"));
        }
        Ok(())
    }
}

impl AggregateRoot for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generated_codes_carry_date_and_parse_back() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let code = UniqueCode::generate(now);
        assert!(code.as_str().starts_with("ITM-20240309-"));
        assert_eq!(code.as_str().len(), "ITM-20240309-".len() + 8);
        assert_eq!(UniqueCode::parse(code.as_str()).unwrap(), code);
    }

    #[test]
    fn generated_codes_differ() {
        let now = Utc::now();
        assert_ne!(UniqueCode::generate(now), UniqueCode::generate(now));
    }

    #[test]
    fn malformed_codes_are_rejected() {
        for raw in ["", "ITM-2024-ABCDEF01", "XYZ-20240309-ABCDEF01", "ITM-20240309-abcdef01", "ITM-20240309-ABCDEF01-9"] {
            assert!(UniqueCode::parse(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn transition_table() {
        use ItemStatus::*;
        assert!(PendingIntake.can_transition_to(Stored));
        assert!(!PendingIntake.can_transition_to(Released));
        assert!(!PendingIntake.can_transition_to(PendingRelease));
        assert!(Stored.can_transition_to(PendingRelease));
        assert!(Stored.can_transition_to(Released));
        assert!(PendingRelease.can_transition_to(Released));
        assert!(!PendingRelease.can_transition_to(Stored));
        assert!(!Stored.can_transition_to(Stored));
        for next in [PendingIntake, Stored, PendingRelease, Released] {
            assert!(!Released.can_transition_to(next));
        }
    }

    #[test]
    fn statuses_and_conditions_parse_case_insensitively() {
        assert_eq!("Stored".parse::<ItemStatus>().unwrap(), ItemStatus::Stored);
        assert_eq!("DAMAGED".parse::<Condition>().unwrap(), Condition::Damaged);
        assert!("disposed".parse::<ItemStatus>().is_err());
        assert!("mint".parse::<Condition>().is_err());
    }
}
