// SQLite-backed timeline store for life-track events.

use crate::core::timeline::{
    EventType, NewTimelineEvent, TimelineError, TimelineEvent, TimelineEventPatch, TimelineQuery,
    TimelineStats, TimelineStore,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Row, Sqlite};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteTimelineStore {
    pool: Pool<Sqlite>,
}

impl SqliteTimelineStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), TimelineError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS timeline_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                event_date TEXT NOT NULL,
                event_type TEXT NOT NULL DEFAULT 'other',
                location TEXT NOT NULL DEFAULT '',
                image TEXT NOT NULL DEFAULT '',
                is_featured BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| TimelineError::Storage(e.to_string()))?;

        Ok(())
    }

    fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> TimelineEvent {
        let event_date_str: String = row.get("event_date");
        let event_type_str: String = row.get("event_type");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        TimelineEvent {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            event_date: NaiveDate::parse_from_str(&event_date_str, DATE_FORMAT)
                .unwrap_or_else(|_| Utc::now().date_naive()),
            event_type: EventType::parse(&event_type_str).unwrap_or_default(),
            location: row.get("location"),
            image: row.get("image"),
            is_featured: row.get("is_featured"),
            created_at: parse_timestamp(&created_at_str),
            updated_at: parse_timestamp(&updated_at_str),
        }
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl TimelineStore for SqliteTimelineStore {
    async fn list_events(
        &self,
        query: &TimelineQuery,
    ) -> Result<Vec<TimelineEvent>, TimelineError> {
        let mut sql = String::from("SELECT * FROM timeline_events WHERE 1=1");
        if query.event_type.is_some() {
            sql.push_str(" AND event_type = ?");
        }
        if query.is_featured.is_some() {
            sql.push_str(" AND is_featured = ?");
        }
        if query.search.is_some() {
            sql.push_str(" AND (title LIKE ? OR description LIKE ? OR location LIKE ?)");
        }
        sql.push_str(" ORDER BY event_date DESC, id DESC LIMIT ? OFFSET ?");

        let mut q = sqlx::query(&sql);
        if let Some(event_type) = query.event_type {
            q = q.bind(event_type.as_str());
        }
        if let Some(is_featured) = query.is_featured {
            q = q.bind(is_featured);
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{search}%");
            q = q.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
        }
        let rows = q
            .bind(query.limit as i64)
            .bind(query.skip as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TimelineError::Storage(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_event).collect())
    }

    async fn get_event(&self, id: i64) -> Result<Option<TimelineEvent>, TimelineError> {
        let row = sqlx::query("SELECT * FROM timeline_events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TimelineError::Storage(e.to_string()))?;
        Ok(row.as_ref().map(Self::row_to_event))
    }

    async fn insert_event(&self, new: NewTimelineEvent) -> Result<TimelineEvent, TimelineError> {
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(
            r#"
            INSERT INTO timeline_events
                (title, description, event_date, event_type, location, image, is_featured, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.event_date.format(DATE_FORMAT).to_string())
        .bind(new.event_type.as_str())
        .bind(&new.location)
        .bind(&new.image)
        .bind(new.is_featured)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TimelineError::Storage(e.to_string()))?;

        Ok(Self::row_to_event(&row))
    }

    async fn update_event(
        &self,
        id: i64,
        patch: TimelineEventPatch,
    ) -> Result<Option<TimelineEvent>, TimelineError> {
        let Some(existing) = self.get_event(id).await? else {
            return Ok(None);
        };

        let title = patch.title.unwrap_or(existing.title);
        let description = patch.description.unwrap_or(existing.description);
        let event_date = patch.event_date.unwrap_or(existing.event_date);
        let event_type = patch.event_type.unwrap_or(existing.event_type);
        let location = patch.location.unwrap_or(existing.location);
        let image = patch.image.unwrap_or(existing.image);
        let is_featured = patch.is_featured.unwrap_or(existing.is_featured);

        let row = sqlx::query(
            r#"
            UPDATE timeline_events
            SET title = ?, description = ?, event_date = ?, event_type = ?,
                location = ?, image = ?, is_featured = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(event_date.format(DATE_FORMAT).to_string())
        .bind(event_type.as_str())
        .bind(&location)
        .bind(&image)
        .bind(is_featured)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TimelineError::Storage(e.to_string()))?;

        Ok(Some(Self::row_to_event(&row)))
    }

    async fn delete_event(&self, id: i64) -> Result<bool, TimelineError> {
        let result = sqlx::query("DELETE FROM timeline_events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| TimelineError::Storage(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<TimelineStats, TimelineError> {
        let year_rows = sqlx::query(
            "SELECT DISTINCT substr(event_date, 1, 4) AS year FROM timeline_events",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TimelineError::Storage(e.to_string()))?;

        let mut years: Vec<i32> = year_rows
            .iter()
            .filter_map(|row| row.get::<String, _>("year").parse().ok())
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_featured) AS featured
            FROM timeline_events
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TimelineError::Storage(e.to_string()))?;

        Ok(TimelineStats {
            years,
            total_events: row.get("total"),
            featured_events: row.get("featured"),
        })
    }
}
