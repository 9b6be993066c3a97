//! Category management. Field mapping only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, StoreError};
use crate::models::Category;
use crate::AppState;

pub async fn list_categories(State(s): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&s.db)
            .await?;
    Ok(Json(categories))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    "📦".to_string()
}

pub async fn create_category(
    State(s): State<AppState>,
    Json(r): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    r.validate()?;
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name, icon, created_at) VALUES ($1, $2, $3, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&r.name)
    .bind(&r.icon)
    .fetch_one(&s.db)
    .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    r.validate()?;
    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2, icon = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&r.name)
    .bind(&r.icon)
    .fetch_optional(&s.db)
    .await?
    .ok_or(StoreError::NotFound)?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
