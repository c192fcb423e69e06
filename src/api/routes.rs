use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::{handlers, menu_handlers, order_handlers, table_handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // User management
        .route("/users/register", post(handlers::register_user::<S>))
        .route("/users/login", post(handlers::login_user::<S>))
        .route("/users/:user_id", delete(handlers::delete_user::<S>))
        // Table management
        .route(
            "/users/:user_id/tables",
            get(table_handlers::list_tables::<S>),
        )
        .route(
            "/users/:user_id/tables",
            post(table_handlers::create_table::<S>),
        )
        .route(
            "/users/:user_id/tables/:name",
            put(table_handlers::update_table::<S>),
        )
        .route(
            "/users/:user_id/tables/:name",
            delete(table_handlers::delete_table::<S>),
        )
        // Menu management
        .route("/users/:user_id/menu", get(menu_handlers::list_menu::<S>))
        .route(
            "/users/:user_id/menu",
            post(menu_handlers::upsert_menu_item::<S>),
        )
        .route(
            "/users/:user_id/menu/:name",
            put(menu_handlers::update_menu_item::<S>),
        )
        .route(
            "/users/:user_id/menu/:name",
            delete(menu_handlers::delete_menu_item::<S>),
        )
        // Order management
        .route(
            "/users/:user_id/orders",
            get(order_handlers::list_orders::<S>),
        )
        .route(
            "/users/:user_id/orders",
            post(order_handlers::submit_orders::<S>),
        )
        // The Android client calls from a device origin, so allow everything
        .layer(CorsLayer::permissive())
}
