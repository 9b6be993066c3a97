//! matjar - bilingual storefront and admin API
//!
//! The customer-facing side covers catalog browsing, a session-keyed cart,
//! promo codes and checkout; the admin side covers product/category/order/
//! promo/message/settings management plus new-order and new-message
//! notifications.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::broadcast;

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;

pub use config::Config;
pub use error::{Result, StoreError};

/// Emitted after every cart mutation so cart-count indicators can refresh
/// without reloading.
#[derive(Clone, Debug, Serialize)]
pub struct CartEvent {
    pub session_id: String,
    pub item_count: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub notifier: notify::Notifier,
    pub cart_events: broadcast::Sender<CartEvent>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, notifier: notify::Notifier) -> Self {
        let (cart_events, _) = broadcast::channel(64);
        Self {
            db,
            config: Arc::new(config),
            notifier,
            cart_events,
        }
    }

    /// Best effort: an event with no live subscriber is simply dropped.
    pub fn broadcast_cart(&self, session_id: &str, item_count: u32) {
        let _ = self.cart_events.send(CartEvent {
            session_id: session_id.to_string(),
            item_count,
        });
    }
}
