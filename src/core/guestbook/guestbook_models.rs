// Guestbook domain models - data structures for the moderated message wall.
//
// These are pure domain types with no HTTP or SQL dependencies.
// The http layer converts these to wire responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a guestbook message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Waiting for an admin decision
    Pending,
    /// Visible on the public wall
    Approved,
    /// Hidden (manually or auto-rejected by the spam filter)
    Rejected,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Approved => "approved",
            MessageStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MessageStatus::Pending),
            "approved" => Some(MessageStatus::Approved),
            "rejected" => Some(MessageStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a banned word counts against a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    /// Weight this severity contributes to the spam score per match.
    pub fn weight(&self) -> f64 {
        match self {
            Severity::High => 0.8,
            Severity::Medium => 0.5,
            Severity::Low => 0.2,
        }
    }
}

/// A stored guestbook message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: i64,
    pub nickname: String,
    pub content: String,
    pub email: Option<String>,
    pub ip_address: String,
    pub status: MessageStatus,
    pub spam_score: f64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

/// Public view of a message - no IP, email or score leaks onto the wall.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePublic {
    pub id: i64,
    pub nickname: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl From<Message> for MessagePublic {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            nickname: m.nickname,
            content: m.content,
            like_count: m.like_count,
            created_at: m.created_at,
            approved_at: m.approved_at,
        }
    }
}

/// A submission before it has been scored and stored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub nickname: String,
    pub content: String,
    pub email: Option<String>,
}

/// Row ready for insertion, produced by the submission pipeline.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub nickname: String,
    pub content: String,
    pub email: Option<String>,
    pub ip_address: String,
    pub status: MessageStatus,
    pub spam_score: f64,
    pub created_at: DateTime<Utc>,
}

/// What the submitter gets back.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub message: String,
    pub status: MessageStatus,
}

/// A configured word that raises the spam score of matching messages.
#[derive(Debug, Clone, Serialize)]
pub struct BannedWord {
    pub id: i64,
    pub word: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBannedWord {
    pub word: String,
    #[serde(default)]
    pub severity: Severity,
}

/// Aggregate counts for the public stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    pub total_messages: i64,
    pub pending_messages: i64,
    pub approved_messages: i64,
}

/// Tunables for the submission pipeline.
#[derive(Debug, Clone)]
pub struct GuestbookConfig {
    /// Messages allowed per IP inside the rate limit window
    pub max_messages_per_window: u32,
    /// Rate limit window in seconds
    pub rate_limit_window_secs: i64,
    /// Spam score at or above which a submission is auto-rejected
    pub auto_reject_threshold: f64,
    /// Nickname length bounds (chars)
    pub max_nickname_len: usize,
    /// Content length bounds (chars)
    pub max_content_len: usize,
}

impl Default for GuestbookConfig {
    fn default() -> Self {
        Self {
            max_messages_per_window: 3, // 3 messages...
            rate_limit_window_secs: 600, // ...per 10 minutes
            auto_reject_threshold: 0.8,
            max_nickname_len: 50,
            max_content_len: 2000,
        }
    }
}
