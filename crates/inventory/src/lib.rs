//! Storage domain: item lifecycle, location registry, movement ledger,
//! allocation, and cost accrual.
//!
//! Deterministic domain logic only (no IO, no HTTP, no storage). Operations
//! take the caller and the clock explicitly and return the state to commit.

pub mod allocation;
pub mod cost;
pub mod directory;
pub mod events;
pub mod item;
pub mod lifecycle;
pub mod location;
pub mod movement;

pub use allocation::{find_available, parse_preference, suggest};
pub use cost::CostAccrual;
pub use directory::{Category, Warehouse};
pub use events::{ItemEvent, ItemRef};
pub use item::{Condition, Item, ItemStatus, UniqueCode};
pub use lifecycle::{CreateItem, CreateRefs, IntakeItem, MoveItem, ReleaseItem, Transition, UpdateItem};
pub use location::{LocationCode, LocationPatch, LocationSize, LocationStatus, NewLocation, StorageLocation};
pub use movement::{ActionType, MovementRecord};
