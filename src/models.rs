//! Canonical persisted entities. The historical camelCase field spellings
//! from the localStorage-era client are accepted only at the DTO boundary in
//! the handlers; nothing below this layer sees them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::cart::CartLine;
use crate::domain::payment::{PaymentFlags, PaymentMethod};
use crate::domain::pricing;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Decimal,
    pub discount_percent: Decimal,
    pub stock: i32,
    pub rating: i16,
    pub category_id: Option<Uuid>,
    /// Denormalized from the category join; products saved before the
    /// migration may carry only one of id/name.
    pub category_name: Option<String>,
    pub image: Option<String>,
    pub images: Vec<String>,
    pub payment_settings: Option<Json<PaymentFlags>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Price after the product's own discount. Always derived, never stored.
    pub fn effective_price(&self) -> Decimal {
        pricing::effective_unit_price(self.price, self.discount_percent)
    }

    pub fn allow_list(&self) -> Option<PaymentFlags> {
        self.payment_settings.as_ref().map(|j| j.0.clone())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    InProgress,
    Shipped,
    Delivered,
}

/// A persisted order line. `unit_price` already has the item discount
/// applied and is rounded to two places.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_phone2: Option<String>,
    pub customer_address: String,
    pub items: Json<Vec<OrderLine>>,
    pub subtotal_amount: Decimal,
    pub promo_code: Option<String>,
    pub promo_discount: Decimal,
    pub shipping_cost: Decimal,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "message_status", rename_all = "lowercase")]
pub enum MessageStatus {
    New,
    Read,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub facebook: String,
    pub instagram: String,
    #[serde(alias = "checkoutNotice")]
    pub checkout_notice: String,
    #[serde(alias = "aboutUs")]
    pub about_us: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreSettings {
    pub id: i32,
    pub payment_methods: Json<PaymentFlags>,
    pub contact_info: Json<ContactInfo>,
    /// None or zero both mean free shipping.
    pub shipping_cost: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}

impl StoreSettings {
    pub fn shipping_or_free(&self) -> Decimal {
        self.shipping_cost.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItemRow {
    pub session_id: String,
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub quantity: i32,
    pub position: i32,
}

impl From<CartItemRow> for CartLine {
    fn from(row: CartItemRow) -> Self {
        CartLine {
            product_id: row.product_id,
            name: row.name,
            unit_price: row.unit_price,
            image: row.image,
            quantity: row.quantity.max(1) as u32,
        }
    }
}
