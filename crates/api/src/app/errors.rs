use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use stowage_core::DomainError;
use stowage_infra::service::ServiceError;
use stowage_infra::store::StoreError;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(StoreError::VersionConflict(msg)) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Store(e @ StoreError::DuplicateKey(_)) => {
            json_error(StatusCode::CONFLICT, "conflict", e.to_string())
        }
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage backend error")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "field": field,
                "message": message,
            })),
        )
            .into_response(),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(entity) => json_error(StatusCode::NOT_FOUND, "not_found", format!("{entity} not found")),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvalidState(msg) => json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_state", msg),
        DomainError::Unauthorized(msg) => json_error(StatusCode::FORBIDDEN, "unauthorized", msg),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// `status` + JSON body on success, the mapped error otherwise.
pub fn respond<T: Serialize>(status: StatusCode, result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_kinds_map_to_distinct_statuses() {
        let cases = [
            (DomainError::validation("name", "cannot be empty"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("item"), StatusCode::NOT_FOUND),
            (DomainError::conflict("occupied"), StatusCode::CONFLICT),
            (DomainError::invalid_state("released"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::unauthorized("not yours"), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_to_response(err).status(), status);
        }
    }

    #[test]
    fn backend_failures_are_internal() {
        let res = service_error_to_response(ServiceError::Store(StoreError::Backend("down".to_string())));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
