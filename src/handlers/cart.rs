//! Session-keyed cart endpoints.
//!
//! Every mutation loads the full cart, applies the change through the
//! [`Cart`] rules, persists the whole list back and broadcasts a cart-changed
//! event. Mutations are serialized per request; concurrent sessions writing
//! the same cart resolve last-write-wins, which is the accepted behavior.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartLine};
use crate::error::{Result, StoreError};
use crate::models::{CartItemRow, Product};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub item_count: u32,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let item_count = cart.item_count();
        Self {
            items: cart.into_lines(),
            item_count,
        }
    }
}

async fn load_cart(db: &PgPool, session: &str) -> Result<Cart> {
    let rows = sqlx::query_as::<_, CartItemRow>(
        "SELECT * FROM cart_items WHERE session_id = $1 ORDER BY position",
    )
    .bind(session)
    .fetch_all(db)
    .await?;
    Ok(Cart::from_lines(rows.into_iter().map(Into::into).collect()))
}

/// Replaces the stored list wholesale, keeping insertion order.
async fn save_cart(db: &PgPool, session: &str, cart: &Cart) -> Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM cart_items WHERE session_id = $1")
        .bind(session)
        .execute(&mut *tx)
        .await?;
    for (position, line) in cart.lines().iter().enumerate() {
        sqlx::query(
            "INSERT INTO cart_items \
               (session_id, product_id, name, unit_price, image, quantity, position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(session)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(line.unit_price)
        .bind(&line.image)
        .bind(line.quantity as i32)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn get_cart(
    State(s): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<CartView>> {
    let cart = load_cart(&s.db, &session).await?;
    Ok(Json(cart.into()))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(alias = "productId")]
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

pub async fn add_item(
    State(s): State<AppState>,
    Path(session): Path<String>,
    Json(r): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    if r.quantity == 0 {
        return Err(StoreError::Validation("quantity must be at least 1".into()));
    }
    let product = sqlx::query_as::<_, Product>(
        "SELECT p.*, c.name AS category_name FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id WHERE p.id = $1",
    )
    .bind(r.product_id)
    .fetch_optional(&s.db)
    .await?
    .ok_or(StoreError::NotFound)?;

    let mut cart = load_cart(&s.db, &session).await?;
    cart.add(CartLine {
        product_id: product.id,
        name: product.name.clone(),
        // Snapshot the already-discounted price, rounded like any persisted figure.
        unit_price: product.effective_price().round_dp(2),
        image: product.image.clone(),
        quantity: r.quantity,
    });
    save_cart(&s.db, &session, &cart).await?;
    s.broadcast_cart(&session, cart.item_count());
    Ok((StatusCode::CREATED, Json(cart.into())))
}

#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    pub delta: i32,
}

pub async fn adjust_quantity(
    State(s): State<AppState>,
    Path((session, product_id)): Path<(String, Uuid)>,
    Json(r): Json<AdjustQuantityRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&s.db, &session).await?;
    if !cart.adjust_quantity(product_id, r.delta) {
        return Err(StoreError::NotFound);
    }
    save_cart(&s.db, &session, &cart).await?;
    s.broadcast_cart(&session, cart.item_count());
    Ok(Json(cart.into()))
}

pub async fn remove_item(
    State(s): State<AppState>,
    Path((session, product_id)): Path<(String, Uuid)>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&s.db, &session).await?;
    if !cart.remove(product_id) {
        return Err(StoreError::NotFound);
    }
    save_cart(&s.db, &session, &cart).await?;
    s.broadcast_cart(&session, cart.item_count());
    Ok(Json(cart.into()))
}

pub async fn clear_cart(
    State(s): State<AppState>,
    Path(session): Path<String>,
) -> Result<StatusCode> {
    sqlx::query("DELETE FROM cart_items WHERE session_id = $1")
        .bind(&session)
        .execute(&s.db)
        .await?;
    s.broadcast_cart(&session, 0);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn cart_count(
    State(s): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let (count,): (Option<i64>,) =
        sqlx::query_as("SELECT SUM(quantity) FROM cart_items WHERE session_id = $1")
            .bind(&session)
            .fetch_one(&s.db)
            .await?;
    Ok(Json(serde_json::json!({ "item_count": count.unwrap_or(0) })))
}

/// Server-sent stream of cart-changed events for one session, the hosted
/// stand-in for the browser's "cart-updated" window event.
pub async fn cart_events(
    State(s): State<AppState>,
    Path(session): Path<String>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = s.cart_events.subscribe();
    let stream = futures::stream::unfold((rx, session), |(mut rx, session)| async move {
        loop {
            match rx.recv().await {
                Ok(event) if event.session_id == session => {
                    let sse = Event::default()
                        .json_data(&event)
                        .unwrap_or_else(|_| Event::default());
                    return Some((Ok(sse), (rx, session)));
                }
                Ok(_) => continue,
                // Missed events only matter as counts; the next one carries them.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
