use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{cache, handlers, middleware::metrics_middleware, photos, recent, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Photos
        .route("/photos/search", get(photos::search))
        .route("/photos/last-search", get(photos::last_search))
        .route("/photos/{id}", get(photos::get_photo))
        .route(
            "/photos/{id}/favorite",
            get(photos::get_favorite).put(photos::set_favorite),
        )
        .route("/photos/{id}/favorite/toggle", post(photos::toggle_favorite))
        .route("/favorites", get(photos::list_favorites))
        // Recent queries
        .route("/recent", get(recent::list_recent).delete(recent::clear_recent))
        .route("/recent/{query}", delete(recent::delete_recent))
        // Cache maintenance
        .route("/cache", delete(cache::clear_cache))
        .route("/cache/refresh", post(cache::refresh_cache))
        .route("/cache/count", get(cache::count_for_query))
        // Live snapshots
        .route("/ws", get(ws::ws_handler))
        .with_state(Arc::clone(&state));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics).with_state(state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
