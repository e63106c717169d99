//! Application services: load, decide, commit, then notify.
//!
//! ```text
//! caller + request
//!   ↓
//! 1. Load the item/locations involved from the store
//!   ↓
//! 2. Decide (pure lifecycle/registry rules, produces a Transition)
//!   ↓
//! 3. Commit the ChangeSet atomically (version compare-and-swap)
//!   ↓   stale read? reload and decide again, up to MAX_ATTEMPTS
//! 4. Dispatch notifications (best-effort, after the commit)
//! ```

pub mod clock;
pub mod directory;
pub mod lifecycle;
pub mod registry;
pub mod view;

use thiserror::Error;

use stowage_auth::AuthzError;
use stowage_core::DomainError;

use crate::store::StoreError;

pub use clock::{Clock, ManualClock, SystemClock};
pub use directory::{DirectoryService, NewCategory, NewWarehouse};
pub use lifecycle::ItemLifecycleService;
pub use registry::{DEFAULT_RESERVATION_HOURS, LocationRegistryService};
pub use view::ItemView;

/// How many times an operation is decided again after losing a version race.
pub const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthzError> for ServiceError {
    fn from(value: AuthzError) -> Self {
        ServiceError::Domain(value.into())
    }
}
