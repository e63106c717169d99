//! Warehouses and categories: just enough to seed the storage flows.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::get,
};

use stowage_auth::CallerContext;
use stowage_infra::service::{NewCategory, NewWarehouse};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route("/categories", get(list_categories).post(create_category))
}

pub async fn create_warehouse(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<NewWarehouse>,
) -> Response {
    errors::respond(StatusCode::CREATED, services.directory.create_warehouse(&caller, body).await)
}

pub async fn list_warehouses(Extension(services): Extension<Arc<AppServices>>) -> Response {
    errors::respond(StatusCode::OK, services.directory.warehouses().await)
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<NewCategory>,
) -> Response {
    errors::respond(StatusCode::CREATED, services.directory.create_category(&caller, body).await)
}

pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> Response {
    errors::respond(StatusCode::OK, services.directory.categories().await)
}
