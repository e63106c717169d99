//! Append-only movement ledger records.
//!
//! A `MovementRecord` documents one committed state-changing action on an
//! item. Records are built by the lifecycle transitions and persisted in the
//! same commit as the item/location writes they describe; nothing ever
//! updates or deletes them.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stowage_core::{DomainError, Entity, ItemId, LocationId, MovementId, UserId};

use crate::item::{Condition, ItemStatus};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Intake,
    Release,
    Move,
    ConditionChange,
    StatusChange,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Intake => "intake",
            ActionType::Release => "release",
            ActionType::Move => "move",
            ActionType::ConditionChange => "condition_change",
            ActionType::StatusChange => "status_change",
        }
    }
}

impl core::fmt::Display for ActionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intake" => Ok(ActionType::Intake),
            "release" => Ok(ActionType::Release),
            "move" => Ok(ActionType::Move),
            "condition_change" => Ok(ActionType::ConditionChange),
            "status_change" => Ok(ActionType::StatusChange),
            other => Err(DomainError::validation(
                "action_type",
                format!("unknown action '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    pub item_id: ItemId,
    pub action_type: ActionType,
    pub description: String,
    pub from_location_id: Option<LocationId>,
    pub to_location_id: Option<LocationId>,
    pub previous_condition: Option<Condition>,
    pub new_condition: Option<Condition>,
    pub previous_status: Option<ItemStatus>,
    pub new_status: Option<ItemStatus>,
    pub notes: Option<String>,
    pub performed_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl MovementRecord {
    /// Start a record; snapshot fields are filled with the `with_*` builders.
    pub fn new(
        item_id: ItemId,
        action_type: ActionType,
        description: impl Into<String>,
        performed_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MovementId::new(),
            item_id,
            action_type,
            description: description.into(),
            from_location_id: None,
            to_location_id: None,
            previous_condition: None,
            new_condition: None,
            previous_status: None,
            new_status: None,
            notes: None,
            performed_by,
            created_at,
        }
    }

    pub fn with_locations(mut self, from: Option<LocationId>, to: Option<LocationId>) -> Self {
        self.from_location_id = from;
        self.to_location_id = to;
        self
    }

    pub fn with_conditions(mut self, previous: Condition, new: Condition) -> Self {
        self.previous_condition = Some(previous);
        self.new_condition = Some(new);
        self
    }

    pub fn with_statuses(mut self, previous: ItemStatus, new: ItemStatus) -> Self {
        self.previous_status = Some(previous);
        self.new_status = Some(new);
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }
}

impl Entity for MovementRecord {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_notes_are_dropped() {
        let m = MovementRecord::new(ItemId::new(), ActionType::Move, "x", UserId::new(), Utc::now())
            .with_notes(Some("   ".to_string()));
        assert_eq!(m.notes, None);
    }
}
