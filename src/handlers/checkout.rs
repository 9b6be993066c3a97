//! Checkout: the end-to-end purchase flow for both entry points.
//!
//! Single-item mode buys one product directly ("buy now"); cart mode checks
//! out the whole session cart. Either way the totals are recomputed here from
//! freshly fetched catalog rows, never trusted from the client.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::checkout::{clamp_quantity, stock_decremented};
use crate::domain::payment::{available_methods, PaymentMethod};
use crate::domain::pricing::{price_order, PricedLine, PromoDiscount};
use crate::domain::promo::{normalize_code, PromoLookup};
use crate::error::{Result, StoreError};
use crate::models::{CartItemRow, Order, OrderLine, Product, PromoCode, StoreSettings};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Single-item mode: the product being bought now.
    #[serde(alias = "productId")]
    pub product_id: Option<Uuid>,
    /// Single-item mode quantity; clamped to `[1, stock]`.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Cart mode: the session whose cart is being checked out.
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,

    #[validate(length(min = 1, message = "customer name is required"))]
    #[serde(alias = "customerName")]
    pub customer_name: String,
    #[validate(length(min = 1, message = "phone number is required"))]
    #[serde(alias = "customerPhone")]
    pub customer_phone: String,
    #[serde(alias = "customerPhone2")]
    pub customer_phone2: Option<String>,
    #[validate(length(min = 1, message = "address is required"))]
    #[serde(alias = "customerAddress")]
    pub customer_address: String,

    #[serde(alias = "paymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(alias = "promoCode")]
    pub promo_code: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// A checkout line paired with the live product it was priced from.
struct ResolvedLine {
    product: Product,
    quantity: u32,
}

pub async fn checkout(
    State(s): State<AppState>,
    Json(r): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    r.validate()?;

    let settings = sqlx::query_as::<_, StoreSettings>("SELECT * FROM store_settings WHERE id = 1")
        .fetch_one(&s.db)
        .await?;

    let lines = match (&r.product_id, &r.session_id) {
        (Some(product_id), None) => resolve_single(&s, *product_id, r.quantity).await?,
        (None, Some(session)) => resolve_cart(&s, session).await?,
        _ => {
            return Err(StoreError::Validation(
                "exactly one of product_id or session_id is required".into(),
            ))
        }
    };

    // A method is offered only if enabled store-wide and allowed by every line.
    let allow_lists: Vec<_> = lines.iter().map(|l| l.product.allow_list()).collect();
    if !available_methods(&settings.payment_methods.0, &allow_lists).contains(&r.payment_method) {
        return Err(StoreError::PaymentMethodUnavailable);
    }

    let promo = match &r.promo_code {
        Some(code) => Some(resolve_promo(&s, code).await?),
        None => None,
    };

    let priced: Vec<PricedLine> = lines
        .iter()
        .map(|l| PricedLine {
            unit_price: l.product.price,
            discount_percent: l.product.discount_percent,
            quantity: l.quantity,
        })
        .collect();
    let totals = price_order(
        &priced,
        promo.as_ref().map(|p| PromoDiscount {
            discount_percent: Decimal::from(p.discount_percent),
        }),
        settings.shipping_or_free(),
    )?;

    let items: Vec<OrderLine> = lines
        .iter()
        .map(|l| OrderLine {
            product_id: l.product.id,
            name: l.product.name.clone(),
            unit_price: l.product.effective_price().round_dp(2),
            quantity: l.quantity,
        })
        .collect();

    let mut tx = s.db.begin().await?;
    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders \
           (id, customer_name, customer_phone, customer_phone2, customer_address, items, \
            subtotal_amount, promo_code, promo_discount, shipping_cost, total_amount, \
            payment_method, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'new', NOW()) \
         RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&r.customer_name)
    .bind(&r.customer_phone)
    .bind(&r.customer_phone2)
    .bind(&r.customer_address)
    .bind(sqlx::types::Json(&items))
    // Currency figures are rounded to 2 dp only here, at persistence.
    .bind(totals.subtotal.round_dp(2))
    .bind(promo.as_ref().map(|p| p.code.clone()))
    .bind(totals.promo_discount.round_dp(2))
    .bind(totals.shipping.round_dp(2))
    .bind(totals.total.round_dp(2))
    .bind(r.payment_method)
    .fetch_one(&mut *tx)
    .await?;

    // Guarded decrement. A zero row count means another checkout got the
    // stock first; returning here drops the transaction uncommitted.
    for line in &lines {
        let result = sqlx::query(
            "UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2",
        )
        .bind(line.product.id)
        .bind(line.quantity as i32)
        .execute(&mut *tx)
        .await?;
        if !stock_decremented(result.rows_affected()) {
            tracing::debug!(product_id = %line.product.id, quantity = line.quantity,
                "stock guard rejected checkout");
            return Err(StoreError::InsufficientStock);
        }
    }

    if let Some(session) = &r.session_id {
        sqlx::query("DELETE FROM cart_items WHERE session_id = $1")
            .bind(session)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    if let Some(session) = &r.session_id {
        s.broadcast_cart(session, 0);
    }
    tracing::info!(order_id = %order.id, total = %order.total_amount, "order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

async fn resolve_single(s: &AppState, product_id: Uuid, quantity: u32) -> Result<Vec<ResolvedLine>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT p.*, c.name AS category_name FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id WHERE p.id = $1",
    )
    .bind(product_id)
    .fetch_optional(&s.db)
    .await?
    .ok_or(StoreError::NotFound)?;
    let quantity = clamp_quantity(quantity, product.stock);
    Ok(vec![ResolvedLine { product, quantity }])
}

/// Re-fetches every carted product so checkout sees current stock, price and
/// discount rather than the add-time snapshot. Products meanwhile removed
/// from the catalog drop out of the order.
async fn resolve_cart(s: &AppState, session: &str) -> Result<Vec<ResolvedLine>> {
    let rows = sqlx::query_as::<_, CartItemRow>(
        "SELECT * FROM cart_items WHERE session_id = $1 ORDER BY position",
    )
    .bind(session)
    .fetch_all(&s.db)
    .await?;
    if rows.is_empty() {
        return Err(StoreError::Validation("cart is empty".into()));
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.product_id).collect();
    let products = sqlx::query_as::<_, Product>(
        "SELECT p.*, c.name AS category_name FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id WHERE p.id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(&s.db)
    .await?;

    let lines: Vec<ResolvedLine> = rows
        .into_iter()
        .filter_map(|row| {
            products
                .iter()
                .find(|p| p.id == row.product_id)
                .cloned()
                .map(|product| ResolvedLine {
                    product,
                    quantity: row.quantity.max(1) as u32,
                })
        })
        .collect();
    if lines.is_empty() {
        return Err(StoreError::Validation(
            "none of the carted products are still available".into(),
        ));
    }
    Ok(lines)
}

async fn resolve_promo(s: &AppState, code: &str) -> Result<PromoCode> {
    let normalized = normalize_code(code);
    let row = sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE code = $1")
        .bind(&normalized)
        .fetch_optional(&s.db)
        .await?;
    match PromoLookup::classify(row, |p: &PromoCode| p.is_active) {
        PromoLookup::Found(promo) => Ok(promo),
        // Both failure modes surface the same generic message; the log keeps
        // the distinction.
        PromoLookup::Inactive => {
            tracing::debug!(code = %normalized, "promo code exists but is inactive");
            Err(StoreError::InvalidPromo)
        }
        PromoLookup::NotFound => {
            tracing::debug!(code = %normalized, "promo code not found");
            Err(StoreError::InvalidPromo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_legacy_camel_case_fields() {
        let body = r#"{
            "productId": "7f8d1e7e-5a44-4a8e-9d5a-2f3b4c5d6e7f",
            "quantity": 2,
            "customerName": "أحمد علي",
            "customerPhone": "01000000000",
            "customerAddress": "القاهرة",
            "paymentMethod": "cash",
            "promoCode": "sale20"
        }"#;
        let r: CheckoutRequest = serde_json::from_str(body).unwrap();
        assert_eq!(
            r.product_id.unwrap().to_string(),
            "7f8d1e7e-5a44-4a8e-9d5a-2f3b4c5d6e7f"
        );
        assert_eq!(r.quantity, 2);
        assert_eq!(r.customer_name, "أحمد علي");
        assert_eq!(r.payment_method, PaymentMethod::Cash);
        assert_eq!(r.promo_code.as_deref(), Some("sale20"));
    }

    #[test]
    fn request_accepts_canonical_snake_case_fields() {
        let body = r#"{
            "session_id": "sess-1",
            "customer_name": "سارة",
            "customer_phone": "01200000000",
            "customer_address": "الجيزة",
            "payment_method": "wallet"
        }"#;
        let r: CheckoutRequest = serde_json::from_str(body).unwrap();
        assert_eq!(r.session_id.as_deref(), Some("sess-1"));
        assert_eq!(r.quantity, 1);
        assert_eq!(r.payment_method, PaymentMethod::Wallet);
        assert!(r.promo_code.is_none());
    }
}
