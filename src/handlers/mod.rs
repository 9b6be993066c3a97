//! HTTP surface: thin handlers over the persistence layer, with all business
//! rules delegated to `domain`.

use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod admin;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod messages;
pub mod orders;
pub mod products;
pub mod promos;
pub mod settings;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "healthy", "service": "matjar"})) }),
        )
        .route(
            "/api/v1/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/v1/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/v1/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/v1/categories/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/api/v1/cart/:session",
            get(cart::get_cart).delete(cart::clear_cart),
        )
        .route("/api/v1/cart/:session/items", post(cart::add_item))
        .route(
            "/api/v1/cart/:session/items/:product_id",
            patch(cart::adjust_quantity).delete(cart::remove_item),
        )
        .route("/api/v1/cart/:session/count", get(cart::cart_count))
        .route("/api/v1/cart/:session/events", get(cart::cart_events))
        .route("/api/v1/checkout", post(checkout::checkout))
        .route("/api/v1/orders", get(orders::list_orders))
        .route(
            "/api/v1/orders/:id",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route("/api/v1/orders/:id/status", patch(orders::update_status))
        .route("/api/v1/promos/check", post(promos::check_promo))
        .route(
            "/api/v1/admin/promos",
            get(promos::list_promos).post(promos::create_promo),
        )
        .route(
            "/api/v1/admin/promos/:id",
            delete(promos::delete_promo),
        )
        .route("/api/v1/admin/promos/:id/toggle", patch(promos::toggle_promo))
        .route(
            "/api/v1/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route("/api/v1/messages/:id", delete(messages::delete_message))
        .route("/api/v1/messages/:id/read", patch(messages::mark_read))
        .route(
            "/api/v1/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/api/v1/admin/login", post(admin::login))
        .route("/api/v1/admin/overview", get(admin::overview))
        .route(
            "/api/v1/admin/notifications",
            get(admin::current_notification).delete(admin::dismiss_notification),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
