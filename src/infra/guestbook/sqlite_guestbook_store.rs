// SQLite-backed guestbook store.
//
// Tables:
// - messages: submissions with moderation state and spam score
// - banned_words: scoring wordlist managed by admins
// - message_likes: one row per (message, IP), enforced by the primary key

use crate::core::guestbook::{
    BannedWord, GuestbookError, GuestbookStore, Message, MessageDraft, MessageStats,
    MessageStatus, Severity,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteGuestbookStore {
    pool: Pool<Sqlite>,
}

impl SqliteGuestbookStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), GuestbookError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nickname TEXT NOT NULL,
                content TEXT NOT NULL,
                email TEXT,
                ip_address TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                spam_score REAL NOT NULL DEFAULT 0,
                like_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                approved_at TEXT,
                approved_by TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_messages_ip_created
                ON messages(ip_address, created_at);
            CREATE INDEX IF NOT EXISTS idx_messages_status
                ON messages(status);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS banned_words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL,
                severity TEXT NOT NULL DEFAULT 'medium',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS message_likes (
                message_id INTEGER NOT NULL,
                ip_address TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (message_id, ip_address)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(())
    }

    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Message {
        let status_str: String = row.get("status");
        let created_at_str: String = row.get("created_at");
        let approved_at_str: Option<String> = row.get("approved_at");

        Message {
            id: row.get("id"),
            nickname: row.get("nickname"),
            content: row.get("content"),
            email: row.get("email"),
            ip_address: row.get("ip_address"),
            status: MessageStatus::parse(&status_str).unwrap_or(MessageStatus::Pending),
            spam_score: row.get("spam_score"),
            like_count: row.get("like_count"),
            created_at: parse_timestamp(&created_at_str),
            approved_at: approved_at_str.as_deref().map(parse_timestamp),
            approved_by: row.get("approved_by"),
        }
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl GuestbookStore for SqliteGuestbookStore {
    async fn insert_message(&self, draft: MessageDraft) -> Result<Message, GuestbookError> {
        let row = sqlx::query(
            r#"
            INSERT INTO messages (nickname, content, email, ip_address, status, spam_score, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&draft.nickname)
        .bind(&draft.content)
        .bind(&draft.email)
        .bind(&draft.ip_address)
        .bind(draft.status.as_str())
        .bind(draft.spam_score)
        .bind(draft.created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(Self::row_to_message(&row))
    }

    async fn count_recent_from_ip(
        &self,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, GuestbookError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM messages WHERE ip_address = ? AND created_at >= ?",
        )
        .bind(ip_address)
        .bind(since.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        let count: i64 = row.get("n");
        Ok(count as u32)
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>, GuestbookError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_message))
    }

    async fn list_approved(&self, skip: u32, limit: u32) -> Result<Vec<Message>, GuestbookError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM messages
            WHERE status = 'approved'
            ORDER BY approved_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit as i64)
        .bind(skip as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_message).collect())
    }

    async fn list_all(
        &self,
        status: Option<MessageStatus>,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Message>, GuestbookError> {
        let mut sql = String::from("SELECT * FROM messages");
        if status.is_some() {
            sql.push_str(" WHERE status = ?");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }
        let rows = query
            .bind(limit as i64)
            .bind(skip as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_message).collect())
    }

    async fn set_status(
        &self,
        id: i64,
        status: MessageStatus,
        approved_at: Option<DateTime<Utc>>,
        approved_by: &str,
    ) -> Result<Option<Message>, GuestbookError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = ?,
                approved_at = COALESCE(?, approved_at),
                approved_by = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(approved_at.map(|t| t.to_rfc3339()))
        .bind(approved_by)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_message(id).await
    }

    async fn delete_message(&self, id: i64) -> Result<bool, GuestbookError> {
        sqlx::query("DELETE FROM message_likes WHERE message_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<MessageStats, GuestbookError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved
            FROM messages
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(MessageStats {
            total_messages: row.get("total"),
            pending_messages: row.get("pending"),
            approved_messages: row.get("approved"),
        })
    }

    async fn banned_words(&self) -> Result<Vec<BannedWord>, GuestbookError> {
        let rows = sqlx::query("SELECT * FROM banned_words ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| {
                let severity_str: String = row.get("severity");
                let created_at_str: String = row.get("created_at");
                BannedWord {
                    id: row.get("id"),
                    word: row.get("word"),
                    severity: Severity::parse(&severity_str).unwrap_or(Severity::Medium),
                    created_at: parse_timestamp(&created_at_str),
                }
            })
            .collect())
    }

    async fn add_banned_word(
        &self,
        word: &str,
        severity: Severity,
    ) -> Result<BannedWord, GuestbookError> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO banned_words (word, severity, created_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(word)
        .bind(severity.as_str())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(BannedWord {
            id: row.get("id"),
            word: word.to_string(),
            severity,
            created_at: now,
        })
    }

    async fn has_like(&self, message_id: i64, ip_address: &str) -> Result<bool, GuestbookError> {
        let row = sqlx::query(
            "SELECT 1 AS present FROM message_likes WHERE message_id = ? AND ip_address = ?",
        )
        .bind(message_id)
        .bind(ip_address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn add_like(
        &self,
        message_id: i64,
        ip_address: &str,
        at: DateTime<Utc>,
    ) -> Result<(), GuestbookError> {
        // The primary key keeps this idempotent even under racing requests:
        // the count only moves when the like row was actually inserted.
        let inserted = sqlx::query(
            r#"
            INSERT INTO message_likes (message_id, ip_address, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(message_id, ip_address) DO NOTHING
            "#,
        )
        .bind(message_id)
        .bind(ip_address)
        .bind(at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| GuestbookError::Storage(e.to_string()))?;

        if inserted.rows_affected() > 0 {
            sqlx::query("UPDATE messages SET like_count = like_count + 1 WHERE id = ?")
                .bind(message_id)
                .execute(&self.pool)
                .await
                .map_err(|e| GuestbookError::Storage(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> SqliteGuestbookStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteGuestbookStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn draft(ip: &str, status: MessageStatus, created_at: DateTime<Utc>) -> MessageDraft {
        MessageDraft {
            nickname: "alice".to_string(),
            content: "hello there".to_string(),
            email: None,
            ip_address: ip.to_string(),
            status,
            spam_score: 0.1,
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_roundtrip() {
        let store = store().await;
        let inserted = store
            .insert_message(draft("1.2.3.4", MessageStatus::Pending, Utc::now()))
            .await
            .unwrap();

        let fetched = store.get_message(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched.nickname, "alice");
        assert_eq!(fetched.status, MessageStatus::Pending);
        assert_eq!(fetched.like_count, 0);
        assert!(fetched.approved_at.is_none());
    }

    #[tokio::test]
    async fn recent_count_respects_the_window() {
        let store = store().await;
        let now = Utc::now();
        store
            .insert_message(draft("1.2.3.4", MessageStatus::Pending, now))
            .await
            .unwrap();
        store
            .insert_message(draft(
                "1.2.3.4",
                MessageStatus::Pending,
                now - Duration::minutes(11),
            ))
            .await
            .unwrap();
        store
            .insert_message(draft("5.6.7.8", MessageStatus::Pending, now))
            .await
            .unwrap();

        let count = store
            .count_recent_from_ip("1.2.3.4", now - Duration::minutes(10))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn set_status_updates_stamps() {
        let store = store().await;
        let inserted = store
            .insert_message(draft("1.2.3.4", MessageStatus::Pending, Utc::now()))
            .await
            .unwrap();

        let approved_at = Utc::now();
        let updated = store
            .set_status(inserted.id, MessageStatus::Approved, Some(approved_at), "admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, MessageStatus::Approved);
        assert!(updated.approved_at.is_some());
        assert_eq!(updated.approved_by.as_deref(), Some("admin"));

        // Rejecting afterwards keeps the old approval timestamp untouched
        let rejected = store
            .set_status(inserted.id, MessageStatus::Rejected, None, "admin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rejected.status, MessageStatus::Rejected);

        let missing = store
            .set_status(9999, MessageStatus::Approved, None, "admin")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn approved_listing_orders_by_approval_time() {
        let store = store().await;
        let now = Utc::now();
        let first = store
            .insert_message(draft("a", MessageStatus::Pending, now))
            .await
            .unwrap();
        let second = store
            .insert_message(draft("b", MessageStatus::Pending, now))
            .await
            .unwrap();

        store
            .set_status(first.id, MessageStatus::Approved, Some(now), "admin")
            .await
            .unwrap();
        store
            .set_status(
                second.id,
                MessageStatus::Approved,
                Some(now + Duration::seconds(5)),
                "admin",
            )
            .await
            .unwrap();

        let listed = store.list_approved(0, 10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
    }

    #[tokio::test]
    async fn likes_are_unique_per_ip() {
        let store = store().await;
        let message = store
            .insert_message(draft("9.9.9.9", MessageStatus::Approved, Utc::now()))
            .await
            .unwrap();

        assert!(!store.has_like(message.id, "1.2.3.4").await.unwrap());
        store
            .add_like(message.id, "1.2.3.4", Utc::now())
            .await
            .unwrap();
        assert!(store.has_like(message.id, "1.2.3.4").await.unwrap());
    }

    #[tokio::test]
    async fn stats_and_status_filtering() {
        let store = store().await;
        let now = Utc::now();
        store
            .insert_message(draft("a", MessageStatus::Pending, now))
            .await
            .unwrap();
        store
            .insert_message(draft("b", MessageStatus::Rejected, now))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.pending_messages, 1);
        assert_eq!(stats.approved_messages, 0);

        let rejected = store
            .list_all(Some(MessageStatus::Rejected), 0, 10)
            .await
            .unwrap();
        assert_eq!(rejected.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_message_and_its_likes() {
        let store = store().await;
        let message = store
            .insert_message(draft("a", MessageStatus::Approved, Utc::now()))
            .await
            .unwrap();
        store
            .add_like(message.id, "1.2.3.4", Utc::now())
            .await
            .unwrap();

        assert!(store.delete_message(message.id).await.unwrap());
        assert!(store.get_message(message.id).await.unwrap().is_none());
        assert!(!store.has_like(message.id, "1.2.3.4").await.unwrap());

        assert!(!store.delete_message(message.id).await.unwrap());
    }

    #[tokio::test]
    async fn banned_words_roundtrip() {
        let store = store().await;
        store.add_banned_word("casino", Severity::High).await.unwrap();
        store.add_banned_word("spam", Severity::Low).await.unwrap();

        let words = store.banned_words().await.unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "casino");
        assert_eq!(words[0].severity, Severity::High);
    }
}
