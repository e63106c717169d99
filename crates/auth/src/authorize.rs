//! Role and ownership guards.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use thiserror::Error;

use stowage_core::{DomainError, UserId};

use crate::{CallerContext, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires role {0}")]
    MissingRole(&'static str),

    #[error("forbidden: caller does not own this item")]
    NotOwner,
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        DomainError::unauthorized(value.to_string())
    }
}

/// Admins and employees only.
pub fn require_staff(caller: &CallerContext) -> Result<(), AuthzError> {
    if caller.is_staff() {
        Ok(())
    } else {
        Err(AuthzError::MissingRole("admin or employee"))
    }
}

pub fn require_admin(caller: &CallerContext) -> Result<(), AuthzError> {
    if caller.role == Role::Admin {
        Ok(())
    } else {
        Err(AuthzError::MissingRole("admin"))
    }
}

/// The caller must be the owner, whatever their role.
pub fn require_owner(caller: &CallerContext, owner: UserId) -> Result<(), AuthzError> {
    if caller.id == owner {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

/// Staff may act on any item; everybody else only on their own.
pub fn require_owner_or_staff(caller: &CallerContext, owner: UserId) -> Result<(), AuthzError> {
    if caller.is_staff() {
        return Ok(());
    }
    require_owner(caller, owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_are_not_staff() {
        let caller = CallerContext::client(UserId::new());
        assert_eq!(
            require_staff(&caller),
            Err(AuthzError::MissingRole("admin or employee"))
        );
    }

    #[test]
    fn employees_are_not_admins() {
        let caller = CallerContext::employee(UserId::new());
        assert!(require_staff(&caller).is_ok());
        assert!(require_admin(&caller).is_err());
    }

    #[test]
    fn ownership_is_checked_for_non_staff() {
        let owner = UserId::new();
        assert!(require_owner_or_staff(&CallerContext::client(owner), owner).is_ok());
        assert_eq!(
            require_owner_or_staff(&CallerContext::client(UserId::new()), owner),
            Err(AuthzError::NotOwner)
        );
        assert!(require_owner_or_staff(&CallerContext::employee(UserId::new()), owner).is_ok());
    }

    #[test]
    fn strict_ownership_applies_to_staff_too() {
        let owner = UserId::new();
        assert!(require_owner(&CallerContext::admin(UserId::new()), owner).is_err());
    }

    #[test]
    fn converts_into_unauthorized_domain_error() {
        let err: DomainError = AuthzError::NotOwner.into();
        assert_eq!(err.code(), "unauthorized");
    }
}
