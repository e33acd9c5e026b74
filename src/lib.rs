pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod utils {
    pub mod clean;
    pub mod clock;
    pub mod sanitize;
    pub mod validate;
}

use axum::{extract::DefaultBodyLimit, Extension, Router};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::store::Store;

const BODY_LIMIT: usize = 64 * 1024;

/// The full HTTP surface, bound to `store`.
pub fn app(store: Store) -> Router {
    routes::router()
        .layer(Extension(store))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
