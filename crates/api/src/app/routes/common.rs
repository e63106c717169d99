use core::str::FromStr;

use axum::response::Response;

use stowage_core::DomainError;

use crate::app::{dto, errors};

/// Parse a path identifier, or produce the 400 response for it.
pub fn path_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    dto::parse_id(raw).map_err(errors::domain_error_to_response)
}
