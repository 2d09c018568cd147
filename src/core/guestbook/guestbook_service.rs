// Guestbook service - core business logic for the moderated message wall.
//
// This service handles:
// - Submission validation and per-IP rate limiting
// - Spam scoring and auto-rejection
// - The admin approval workflow (approve / reject / delete)
// - Per-IP message likes
//
// NO HTTP dependencies here - just pure domain logic. Admin authentication
// happens in the http layer before any of these methods are reached.

use super::guestbook_models::{
    BannedWord, GuestbookConfig, Message, MessageDraft, MessageStats, MessageStatus, NewMessage,
    Severity, SubmitReceipt,
};
use super::spam_scorer;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum GuestbookError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Validation(String),

    #[error("message not found")]
    NotFound,

    #[error("too many messages, please wait before submitting again")]
    RateLimited,
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting guestbook data.
#[async_trait]
pub trait GuestbookStore: Send + Sync {
    /// Insert a scored draft and return the stored message with its id.
    async fn insert_message(&self, draft: MessageDraft) -> Result<Message, GuestbookError>;

    /// Count messages submitted from an IP since the given instant.
    async fn count_recent_from_ip(
        &self,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, GuestbookError>;

    async fn get_message(&self, id: i64) -> Result<Option<Message>, GuestbookError>;

    /// Approved messages ordered by approval time descending.
    async fn list_approved(&self, skip: u32, limit: u32) -> Result<Vec<Message>, GuestbookError>;

    /// All messages (optionally filtered by status) ordered by creation descending.
    async fn list_all(
        &self,
        status: Option<MessageStatus>,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Message>, GuestbookError>;

    /// Update a message's status and moderation stamps.
    /// Returns the updated message, or `None` if the id does not exist.
    async fn set_status(
        &self,
        id: i64,
        status: MessageStatus,
        approved_at: Option<DateTime<Utc>>,
        approved_by: &str,
    ) -> Result<Option<Message>, GuestbookError>;

    /// Returns `true` if a message was deleted.
    async fn delete_message(&self, id: i64) -> Result<bool, GuestbookError>;

    async fn stats(&self) -> Result<MessageStats, GuestbookError>;

    /// Live snapshot of configured banned words.
    async fn banned_words(&self) -> Result<Vec<BannedWord>, GuestbookError>;

    async fn add_banned_word(
        &self,
        word: &str,
        severity: Severity,
    ) -> Result<BannedWord, GuestbookError>;

    /// Whether this IP already liked this message.
    async fn has_like(&self, message_id: i64, ip_address: &str) -> Result<bool, GuestbookError>;

    /// Record a like and bump the message's like count.
    async fn add_like(
        &self,
        message_id: i64,
        ip_address: &str,
        at: DateTime<Utc>,
    ) -> Result<(), GuestbookError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Moderated guestbook: submissions run through rate limiting and spam
/// scoring, admins decide what reaches the public wall.
pub struct GuestbookService<S: GuestbookStore> {
    store: S,
    config: GuestbookConfig,
}

impl<S: GuestbookStore> GuestbookService<S> {
    pub fn new(store: S, config: GuestbookConfig) -> Self {
        Self { store, config }
    }

    /// Submit a new message from the given IP.
    ///
    /// Validation and rate limiting run first; only then is the spam score
    /// computed against the current banned-word snapshot. A score at or above
    /// the auto-reject threshold skips human review entirely.
    pub async fn submit(
        &self,
        new: NewMessage,
        ip_address: &str,
    ) -> Result<SubmitReceipt, GuestbookError> {
        self.validate(&new)?;

        let now = Utc::now();
        let window_start = now - Duration::seconds(self.config.rate_limit_window_secs);
        let recent = self
            .store
            .count_recent_from_ip(ip_address, window_start)
            .await?;
        if recent >= self.config.max_messages_per_window {
            return Err(GuestbookError::RateLimited);
        }

        let banned = self.store.banned_words().await?;
        let spam_score = spam_scorer::score(&new.content, &new.nickname, &banned);

        let status = if spam_score >= self.config.auto_reject_threshold {
            MessageStatus::Rejected
        } else {
            MessageStatus::Pending
        };

        let stored = self
            .store
            .insert_message(MessageDraft {
                nickname: new.nickname,
                content: new.content,
                email: new.email,
                ip_address: ip_address.to_string(),
                status,
                spam_score,
                created_at: now,
            })
            .await?;

        tracing::info!(
            message_id = stored.id,
            spam_score,
            status = %status,
            "guestbook message submitted"
        );

        let message = match status {
            MessageStatus::Rejected => {
                "Your message was flagged by the spam filter and rejected.".to_string()
            }
            _ => "Message submitted, it will appear once reviewed.".to_string(),
        };
        Ok(SubmitReceipt { message, status })
    }

    fn validate(&self, new: &NewMessage) -> Result<(), GuestbookError> {
        let nickname_len = new.nickname.chars().count();
        if nickname_len == 0 || nickname_len > self.config.max_nickname_len {
            return Err(GuestbookError::Validation(format!(
                "nickname must be 1-{} characters",
                self.config.max_nickname_len
            )));
        }
        let content_len = new.content.chars().count();
        if content_len == 0 || content_len > self.config.max_content_len {
            return Err(GuestbookError::Validation(format!(
                "content must be 1-{} characters",
                self.config.max_content_len
            )));
        }
        Ok(())
    }

    /// Approved messages for the public wall, newest approval first.
    pub async fn list_approved(
        &self,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Message>, GuestbookError> {
        self.store.list_approved(skip, limit.clamp(1, 100)).await
    }

    pub async fn stats(&self) -> Result<MessageStats, GuestbookError> {
        self.store.stats().await
    }

    /// Like a message once per IP. A repeat like is a validation error and
    /// changes nothing.
    pub async fn like(&self, message_id: i64, ip_address: &str) -> Result<Message, GuestbookError> {
        let message = self
            .store
            .get_message(message_id)
            .await?
            .ok_or(GuestbookError::NotFound)?;

        if self.store.has_like(message_id, ip_address).await? {
            return Err(GuestbookError::Validation(
                "already liked from this address".to_string(),
            ));
        }

        self.store.add_like(message_id, ip_address, Utc::now()).await?;
        Ok(Message {
            like_count: message.like_count + 1,
            ..message
        })
    }

    // ------------------------------------------------------------------
    // Admin operations (credential checked by the caller)
    // ------------------------------------------------------------------

    pub async fn admin_list(
        &self,
        status: Option<MessageStatus>,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Message>, GuestbookError> {
        self.store.list_all(status, skip, limit.clamp(1, 200)).await
    }

    /// Approve a message: stamps both the approval time and the approver.
    /// Deliberately permissive - works from any current status.
    pub async fn approve(&self, id: i64, approver: &str) -> Result<Message, GuestbookError> {
        let updated = self
            .store
            .set_status(id, MessageStatus::Approved, Some(Utc::now()), approver)
            .await?
            .ok_or(GuestbookError::NotFound)?;
        tracing::info!(message_id = id, approver, "message approved");
        Ok(updated)
    }

    /// Reject a message: stamps only the approver, never the approval time.
    pub async fn reject(&self, id: i64, approver: &str) -> Result<Message, GuestbookError> {
        let updated = self
            .store
            .set_status(id, MessageStatus::Rejected, None, approver)
            .await?
            .ok_or(GuestbookError::NotFound)?;
        tracing::info!(message_id = id, approver, "message rejected");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), GuestbookError> {
        if !self.store.delete_message(id).await? {
            return Err(GuestbookError::NotFound);
        }
        tracing::info!(message_id = id, "message deleted");
        Ok(())
    }

    pub async fn add_banned_word(
        &self,
        word: &str,
        severity: Severity,
    ) -> Result<BannedWord, GuestbookError> {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return Err(GuestbookError::Validation(
                "banned word must not be empty".to_string(),
            ));
        }
        self.store.add_banned_word(trimmed, severity).await
    }

    pub async fn banned_words(&self) -> Result<Vec<BannedWord>, GuestbookError> {
        self.store.banned_words().await
    }
}

// ============================================================================
// TESTS
// ============================================================================
