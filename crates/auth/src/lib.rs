//! `stowage-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Callers are
//! identified by an explicit [`CallerContext`] that every core operation
//! receives as a parameter.

pub mod authorize;
pub mod caller;
pub mod claims;
pub mod jwt;
pub mod roles;

pub use authorize::{AuthzError, require_admin, require_owner, require_owner_or_staff, require_staff};
pub use caller::CallerContext;
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator, encode_hs256};
pub use roles::Role;
