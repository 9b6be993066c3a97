//! Contact messages: public submission, admin inbox.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, StoreError};
use crate::models::Message;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, message = "name is required"))]
    #[serde(alias = "fullName", alias = "name")]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "message content is required"))]
    pub content: String,
}

pub async fn create_message(
    State(s): State<AppState>,
    Json(r): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    r.validate()?;
    let message = sqlx::query_as::<_, Message>(
        "INSERT INTO messages (id, full_name, email, content, status, created_at) \
         VALUES ($1, $2, $3, $4, 'new', NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&r.full_name)
    .bind(&r.email)
    .bind(&r.content)
    .fetch_one(&s.db)
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(State(s): State<AppState>) -> Result<Json<Vec<Message>>> {
    let messages =
        sqlx::query_as::<_, Message>("SELECT * FROM messages ORDER BY created_at DESC")
            .fetch_all(&s.db)
            .await?;
    Ok(Json(messages))
}

/// new → read, triggered when the admin opens a message.
pub async fn mark_read(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Message>> {
    let message = sqlx::query_as::<_, Message>(
        "UPDATE messages SET status = 'read' WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&s.db)
    .await?
    .ok_or(StoreError::NotFound)?;
    Ok(Json(message))
}

pub async fn delete_message(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
