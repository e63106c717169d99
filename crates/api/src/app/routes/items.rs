use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};

use stowage_auth::CallerContext;
use stowage_core::ItemId;
use stowage_infra::service::ServiceError;
use stowage_inventory::{CreateItem, IntakeItem, MoveItem, ReleaseItem, UpdateItem};

use crate::app::routes::common::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/my", get(my_items))
        .route("/:id", get(get_item).put(update_item))
        .route("/:id/intake", post(intake_item))
        .route("/:id/request-release", post(request_release))
        .route("/:id/release", post(release_item))
        .route("/:id/move", post(move_item))
        .route("/:id/history", get(item_history))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<CreateItem>,
) -> Response {
    let result = match services.items.create(&caller, body).await {
        Ok(item) => services.items.view(item).await,
        Err(e) => Err(e),
    };
    errors::respond(StatusCode::CREATED, result)
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<dto::ItemListQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let result = match services.items.list(&caller, filter, query.pagination()).await {
        Ok(page) => services.items.view_page(page).await,
        Err(e) => Err(e),
    };
    errors::respond(StatusCode::OK, result)
}

/// GET /items/my
///
/// `owner_id` in the query is ignored: the listing is always the caller's.
pub async fn my_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<dto::ItemListQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let result = match services.items.list_mine(&caller, filter, query.pagination()).await {
        Ok(page) => services.items.view_page(page).await,
        Err(e) => Err(e),
    };
    errors::respond(StatusCode::OK, result)
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ItemId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let result = match services.items.get(&caller, id).await {
        Ok(item) => services.items.view(item).await,
        Err(e) => Err(e),
    };
    errors::respond(StatusCode::OK, result)
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<UpdateItem>,
) -> Response {
    let id: ItemId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let result = services.items.update(&caller, id, body).await;
    view_of(&services, result).await
}

pub async fn intake_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    body: Option<Json<IntakeItem>>,
) -> Response {
    let id: ItemId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let cmd = body.map(|Json(b)| b).unwrap_or_default();
    let result = services.items.intake(&caller, id, cmd).await;
    view_of(&services, result).await
}

pub async fn request_release(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ItemId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let result = services.items.request_release(&caller, id).await;
    view_of(&services, result).await
}

pub async fn release_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    body: Option<Json<ReleaseItem>>,
) -> Response {
    let id: ItemId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let cmd = body.map(|Json(b)| b).unwrap_or_default();
    let result = services.items.release(&caller, id, cmd).await;
    view_of(&services, result).await
}

pub async fn move_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<MoveItem>,
) -> Response {
    let id: ItemId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let result = services.items.move_item(&caller, id, body).await;
    view_of(&services, result).await
}

pub async fn item_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ItemId = match path_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    errors::respond(StatusCode::OK, services.items.history(&caller, id).await)
}

async fn view_of(services: &AppServices, result: Result<stowage_inventory::Item, ServiceError>) -> Response {
    let result = match result {
        Ok(item) => services.items.view(item).await,
        Err(e) => Err(e),
    };
    errors::respond(StatusCode::OK, result)
}
