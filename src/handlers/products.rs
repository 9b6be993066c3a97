//! Product catalog: public reads with search/category filtering, admin CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::payment::PaymentFlags;
use crate::error::{Result, StoreError};
use crate::models::Product;
use crate::AppState;

const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.description, p.details, p.price, p.discount_percent, p.stock, p.rating, \
     p.category_id, c.name AS category_name, p.image, p.images, p.payment_settings, \
     p.created_at, p.updated_at";

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    /// Category by name, matching how the storefront filter chips work.
    pub category: Option<String>,
}

pub async fn list_products(
    State(s): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>> {
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id \
         WHERE ($1::text IS NULL \
                OR p.name ILIKE '%' || $1 || '%' \
                OR p.description ILIKE '%' || $1 || '%') \
           AND ($2::text IS NULL OR c.name = $2) \
         ORDER BY p.created_at DESC"
    );
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(search)
        .bind(params.category.as_deref())
        .fetch_all(&s.db)
        .await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id \
         WHERE p.id = $1"
    );
    sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .map(Json)
        .ok_or(StoreError::NotFound)
}

/// Accepts both the canonical snake_case fields and the pre-migration
/// camelCase spellings; only the canonical form continues inward.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Decimal,
    #[serde(default, alias = "discountPercent")]
    pub discount_percent: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[serde(alias = "categoryId")]
    pub category_id: Option<Uuid>,
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(alias = "paymentSettings")]
    pub payment_settings: Option<PaymentFlags>,
}

fn default_rating() -> i16 {
    5
}

impl ProductRequest {
    fn check(&self) -> Result<()> {
        self.validate()?;
        if self.price < Decimal::ZERO {
            return Err(StoreError::Validation("price cannot be negative".into()));
        }
        if self.discount_percent < Decimal::ZERO || self.discount_percent > Decimal::ONE_HUNDRED {
            return Err(StoreError::Validation(
                "discount_percent must be within 0..=100".into(),
            ));
        }
        Ok(())
    }
}

pub async fn create_product(
    State(s): State<AppState>,
    Json(r): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    r.check()?;
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products \
           (id, name, description, details, price, discount_percent, stock, rating, \
            category_id, image, images, payment_settings, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW()) \
         RETURNING *, (SELECT name FROM categories WHERE id = $9) AS category_name",
    )
    .bind(Uuid::now_v7())
    .bind(&r.name)
    .bind(&r.description)
    .bind(&r.details)
    .bind(r.price)
    .bind(r.discount_percent)
    .bind(r.stock)
    .bind(r.rating)
    .bind(r.category_id)
    .bind(&r.image)
    .bind(&r.images)
    .bind(r.payment_settings.as_ref().map(sqlx::types::Json))
    .fetch_one(&s.db)
    .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<ProductRequest>,
) -> Result<Json<Product>> {
    r.check()?;
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET \
           name = $2, description = $3, details = $4, price = $5, discount_percent = $6, \
           stock = $7, rating = $8, category_id = $9, image = $10, images = $11, \
           payment_settings = $12, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING *, (SELECT name FROM categories WHERE id = $9) AS category_name",
    )
    .bind(id)
    .bind(&r.name)
    .bind(&r.description)
    .bind(&r.details)
    .bind(r.price)
    .bind(r.discount_percent)
    .bind(r.stock)
    .bind(r.rating)
    .bind(r.category_id)
    .bind(&r.image)
    .bind(&r.images)
    .bind(r.payment_settings.as_ref().map(sqlx::types::Json))
    .fetch_optional(&s.db)
    .await?
    .ok_or(StoreError::NotFound)?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_legacy_camel_case_fields() {
        let body = r#"{
            "name": "حذاء رياضي",
            "price": "499.99",
            "discountPercent": "15",
            "categoryId": "7f8d1e7e-5a44-4a8e-9d5a-2f3b4c5d6e7f",
            "paymentSettings": {"visa": false}
        }"#;
        let r: ProductRequest = serde_json::from_str(body).unwrap();
        assert_eq!(r.price, Decimal::new(49999, 2));
        assert_eq!(r.discount_percent, Decimal::new(15, 0));
        assert_eq!(
            r.category_id.unwrap().to_string(),
            "7f8d1e7e-5a44-4a8e-9d5a-2f3b4c5d6e7f"
        );
        let flags = r.payment_settings.clone().unwrap();
        assert!(!flags.visa);
        assert!(flags.cash);
        assert_eq!(r.rating, 5);
        r.check().unwrap();
    }
}
