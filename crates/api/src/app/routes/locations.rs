use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use stowage_auth::CallerContext;
use stowage_core::{LocationId, WarehouseId};
use stowage_inventory::{LocationPatch, NewLocation};

use crate::app::routes::common::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/suggest", get(suggest_location))
        .route("/:id", get(get_location).put(update_location).delete(delete_location))
        .route("/:id/reserve", post(reserve_location))
        .route("/:id/unreserve", post(unreserve_location))
}

pub async fn list_locations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<dto::LocationListQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let result = services.locations.list(&caller, filter, query.available_only).await;
    errors::respond(StatusCode::OK, result)
}

pub async fn create_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<NewLocation>,
) -> Response {
    errors::respond(StatusCode::CREATED, services.locations.create(&caller, body).await)
}

/// GET /storage-locations/suggest?warehouse_id=..&preferred_size=..
pub async fn suggest_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<dto::SuggestQuery>,
) -> Response {
    let warehouse_id: WarehouseId = match path_id(&query.warehouse_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let result = services
        .locations
        .suggest(&caller, warehouse_id, query.preferred())
        .await;
    errors::respond(StatusCode::OK, result)
}

pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let id: LocationId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    errors::respond(StatusCode::OK, services.locations.get(&caller, id).await)
}

pub async fn update_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<LocationPatch>,
) -> Response {
    let id: LocationId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    errors::respond(StatusCode::OK, services.locations.update(&caller, id, body).await)
}

pub async fn delete_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let id: LocationId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.locations.delete(&caller, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn reserve_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    body: Option<Json<dto::ReserveRequest>>,
) -> Response {
    let id: LocationId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let hours = body.and_then(|Json(b)| b.hours);
    errors::respond(StatusCode::OK, services.locations.reserve(&caller, id, hours).await)
}

pub async fn unreserve_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let id: LocationId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    errors::respond(StatusCode::OK, services.locations.unreserve(&caller, id).await)
}
