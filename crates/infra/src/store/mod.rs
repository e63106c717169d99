//! Persistence boundary for items, locations, the movement ledger, and the
//! warehouse/category directory.
//!
//! Stores make no domain decisions; they load entities, list them, and apply
//! a [`ChangeSet`] atomically with optimistic version checks.

pub mod in_memory;
pub mod postgres;
pub mod query;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use query::{ItemFilter, LocationFilter, Page, Pagination};
pub use r#trait::{ChangeSet, Committed, InventoryStore, StoreError, UniqueKey};
