use axum::{Router, routing::get};

pub mod common;
pub mod directory;
pub mod items;
pub mod locations;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .nest("/items", items::router())
        .nest("/storage-locations", locations::router())
        .merge(directory::router())
}
