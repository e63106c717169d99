use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use stowage_auth::CallerContext;
use stowage_core::WarehouseId;

use crate::app::routes::common::path_id;
use crate::app::{dto, services::AppServices};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(caller): Extension<CallerContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "id": caller.id.to_string(),
        "role": caller.role.as_str(),
        "is_staff": caller.is_staff(),
    }))
}

/// GET /stream
///
/// Server-sent notifications the caller may see: their own, plus staff and
/// (with `?warehouse_id=`) warehouse groups for staff.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<dto::StreamQuery>,
) -> Response {
    let warehouse = match query.warehouse_id.as_deref().map(path_id::<WarehouseId>).transpose() {
        Ok(w) => w,
        Err(res) => return res,
    };
    services.notification_stream(caller, warehouse).into_response()
}
