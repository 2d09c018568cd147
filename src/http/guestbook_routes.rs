// Guestbook routes - the public message wall plus the admin moderation
// surface. Admin handlers take the `AdminKey` extractor, public ones don't.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::core::guestbook::{
    BannedWord, Message, MessagePublic, MessageStats, MessageStatus, NewBannedWord, NewMessage,
    SubmitReceipt,
};
use crate::http::error::ApiError;
use crate::http::extract::{AdminKey, ClientIp};
use crate::http::AppState;

/// Name stamped into `approved_by`; the API key is shared, so there is no
/// per-moderator identity to record.
const MODERATOR: &str = "admin";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(submit_message).get(list_messages))
        .route("/messages/stats", get(message_stats))
        .route("/messages/{id}/like", post(like_message))
        .route("/admin/messages", get(admin_list_messages))
        .route("/admin/messages/{id}", delete(delete_message))
        .route("/admin/messages/{id}/approve", put(approve_message))
        .route("/admin/messages/{id}/reject", put(reject_message))
        .route(
            "/admin/banned-words",
            get(list_banned_words).post(add_banned_word),
        )
}

// ============================================================================
// PUBLIC
// ============================================================================

fn default_public_limit() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
struct PublicPage {
    #[serde(default)]
    skip: u32,
    #[serde(default = "default_public_limit")]
    limit: u32,
}

async fn submit_message(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(new): Json<NewMessage>,
) -> Result<Json<SubmitReceipt>, ApiError> {
    Ok(Json(state.guestbook.submit(new, &ip).await?))
}

async fn list_messages(
    State(state): State<AppState>,
    Query(page): Query<PublicPage>,
) -> Result<Json<Vec<MessagePublic>>, ApiError> {
    let messages = state.guestbook.list_approved(page.skip, page.limit).await?;
    Ok(Json(messages.into_iter().map(MessagePublic::from).collect()))
}

async fn message_stats(State(state): State<AppState>) -> Result<Json<MessageStats>, ApiError> {
    Ok(Json(state.guestbook.stats().await?))
}

async fn like_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ClientIp(ip): ClientIp,
) -> Result<Json<MessagePublic>, ApiError> {
    let message = state.guestbook.like(id, &ip).await?;
    Ok(Json(MessagePublic::from(message)))
}

// ============================================================================
// ADMIN
// ============================================================================

fn default_admin_limit() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
struct AdminPage {
    status: Option<MessageStatus>,
    #[serde(default)]
    skip: u32,
    #[serde(default = "default_admin_limit")]
    limit: u32,
}

async fn admin_list_messages(
    _admin: AdminKey,
    State(state): State<AppState>,
    Query(page): Query<AdminPage>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(
        state
            .guestbook
            .admin_list(page.status, page.skip, page.limit)
            .await?,
    ))
}

async fn approve_message(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    Ok(Json(state.guestbook.approve(id, MODERATOR).await?))
}

async fn reject_message(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    Ok(Json(state.guestbook.reject(id, MODERATOR).await?))
}

async fn delete_message(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.guestbook.delete(id).await?;
    Ok(Json(json!({ "message": "Message deleted" })))
}

async fn list_banned_words(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> Result<Json<Vec<BannedWord>>, ApiError> {
    Ok(Json(state.guestbook.banned_words().await?))
}

async fn add_banned_word(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(new): Json<NewBannedWord>,
) -> Result<Json<BannedWord>, ApiError> {
    Ok(Json(
        state
            .guestbook
            .add_banned_word(&new.word, new.severity)
            .await?,
    ))
}
