use serde::{Deserialize, Serialize};

use stowage_core::UserId;

use crate::Role;

/// Authenticated identity of whoever invokes a core operation.
///
/// Built once at the transport boundary (e.g. from verified JWT claims) and
/// passed explicitly into every lifecycle and registry operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    pub id: UserId,
    pub role: Role,
}

impl CallerContext {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn client(id: UserId) -> Self {
        Self::new(id, Role::Client)
    }

    pub fn employee(id: UserId) -> Self {
        Self::new(id, Role::Employee)
    }

    pub fn admin(id: UserId) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
