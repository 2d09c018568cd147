// SQLite-backed gallery store for photo and video metadata.
//
// Tables:
// - photos: title, file path, category, description
// - videos: same plus embed link and thumbnail

use crate::core::gallery::{
    Category, GalleryError, GalleryQuery, GalleryStats, GalleryStore, NewPhoto, NewVideo, Photo,
    PhotoPatch, Video, VideoPatch,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteGalleryStore {
    pool: Pool<Sqlite>,
}

impl SqliteGalleryStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), GalleryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS photos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                file_path TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'life',
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| GalleryError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                file_path TEXT NOT NULL DEFAULT '',
                embed_link TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'life',
                description TEXT NOT NULL DEFAULT '',
                thumbnail TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(())
    }

    fn row_to_photo(row: &sqlx::sqlite::SqliteRow) -> Photo {
        let category_str: String = row.get("category");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");
        Photo {
            id: row.get("id"),
            title: row.get("title"),
            file_path: row.get("file_path"),
            category: Category::parse(&category_str).unwrap_or_default(),
            description: row.get("description"),
            created_at: parse_timestamp(&created_at_str),
            updated_at: parse_timestamp(&updated_at_str),
        }
    }

    fn row_to_video(row: &sqlx::sqlite::SqliteRow) -> Video {
        let category_str: String = row.get("category");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");
        Video {
            id: row.get("id"),
            title: row.get("title"),
            file_path: row.get("file_path"),
            embed_link: row.get("embed_link"),
            category: Category::parse(&category_str).unwrap_or_default(),
            description: row.get("description"),
            thumbnail: row.get("thumbnail"),
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

/// Build the shared WHERE/ORDER/LIMIT tail for photo and video listings.
fn listing_sql(table: &str, query: &GalleryQuery) -> String {
    let mut sql = format!("SELECT * FROM {table} WHERE 1=1");
    if query.category.is_some() {
        sql.push_str(" AND category = ?");
    }
    if query.search.is_some() {
        sql.push_str(" AND (title LIKE ? OR description LIKE ?)");
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
    sql
}

#[async_trait]
impl GalleryStore for SqliteGalleryStore {
    async fn list_photos(&self, query: &GalleryQuery) -> Result<Vec<Photo>, GalleryError> {
        let sql = listing_sql("photos", query);
        let mut q = sqlx::query(&sql);
        if let Some(category) = query.category {
            q = q.bind(category.as_str());
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{search}%");
            q = q.bind(pattern.clone()).bind(pattern);
        }
        let rows = q
            .bind(query.limit as i64)
            .bind(query.skip as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_photo).collect())
    }

    async fn get_photo(&self, id: i64) -> Result<Option<Photo>, GalleryError> {
        let row = sqlx::query("SELECT * FROM photos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| GalleryError::Storage(e.to_string()))?;
        Ok(row.as_ref().map(Self::row_to_photo))
    }

    async fn insert_photo(&self, new: NewPhoto) -> Result<Photo, GalleryError> {
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(
            r#"
            INSERT INTO photos (title, file_path, category, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.file_path)
        .bind(new.category.as_str())
        .bind(&new.description)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(Self::row_to_photo(&row))
    }

    async fn update_photo(
        &self,
        id: i64,
        patch: PhotoPatch,
    ) -> Result<Option<Photo>, GalleryError> {
        let Some(existing) = self.get_photo(id).await? else {
            return Ok(None);
        };

        let title = patch.title.unwrap_or(existing.title);
        let category = patch.category.unwrap_or(existing.category);
        let description = patch.description.unwrap_or(existing.description);

        let row = sqlx::query(
            r#"
            UPDATE photos
            SET title = ?, category = ?, description = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&title)
        .bind(category.as_str())
        .bind(&description)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(Some(Self::row_to_photo(&row)))
    }

    async fn delete_photo(&self, id: i64) -> Result<bool, GalleryError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| GalleryError::Storage(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_videos(&self, query: &GalleryQuery) -> Result<Vec<Video>, GalleryError> {
        let sql = listing_sql("videos", query);
        let mut q = sqlx::query(&sql);
        if let Some(category) = query.category {
            q = q.bind(category.as_str());
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{search}%");
            q = q.bind(pattern.clone()).bind(pattern);
        }
        let rows = q
            .bind(query.limit as i64)
            .bind(query.skip as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_video).collect())
    }

    async fn get_video(&self, id: i64) -> Result<Option<Video>, GalleryError> {
        let row = sqlx::query("SELECT * FROM videos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| GalleryError::Storage(e.to_string()))?;
        Ok(row.as_ref().map(Self::row_to_video))
    }

    async fn insert_video(&self, new: NewVideo) -> Result<Video, GalleryError> {
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(
            r#"
            INSERT INTO videos (title, file_path, embed_link, category, description, thumbnail, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.file_path)
        .bind(&new.embed_link)
        .bind(new.category.as_str())
        .bind(&new.description)
        .bind(&new.thumbnail)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(Self::row_to_video(&row))
    }

    async fn update_video(
        &self,
        id: i64,
        patch: VideoPatch,
    ) -> Result<Option<Video>, GalleryError> {
        let Some(existing) = self.get_video(id).await? else {
            return Ok(None);
        };

        let title = patch.title.unwrap_or(existing.title);
        let file_path = patch.file_path.unwrap_or(existing.file_path);
        let embed_link = patch.embed_link.unwrap_or(existing.embed_link);
        let category = patch.category.unwrap_or(existing.category);
        let description = patch.description.unwrap_or(existing.description);
        let thumbnail = patch.thumbnail.unwrap_or(existing.thumbnail);

        let row = sqlx::query(
            r#"
            UPDATE videos
            SET title = ?, file_path = ?, embed_link = ?, category = ?,
                description = ?, thumbnail = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&title)
        .bind(&file_path)
        .bind(&embed_link)
        .bind(category.as_str())
        .bind(&description)
        .bind(&thumbnail)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(Some(Self::row_to_video(&row)))
    }

    async fn delete_video(&self, id: i64) -> Result<bool, GalleryError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| GalleryError::Storage(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<GalleryStats, GalleryError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM photos) AS photos,
                (SELECT COUNT(*) FROM videos) AS videos,
                (SELECT COUNT(DISTINCT category) FROM photos) AS photo_categories,
                (SELECT COUNT(DISTINCT category) FROM videos) AS video_categories
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GalleryError::Storage(e.to_string()))?;

        Ok(GalleryStats {
            photos: row.get("photos"),
            videos: row.get("videos"),
            photo_categories: row.get("photo_categories"),
            video_categories: row.get("video_categories"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> SqliteGalleryStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteGalleryStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn photo(title: &str, category: Category, description: &str) -> NewPhoto {
        NewPhoto {
            title: title.to_string(),
            file_path: format!("photos/{title}.jpg"),
            category,
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn photo_crud_roundtrip() {
        let store = store().await;
        let created = store
            .insert_photo(photo("beach", Category::Travel, "summer trip"))
            .await
            .unwrap();

        let fetched = store.get_photo(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "beach");
        assert_eq!(fetched.category, Category::Travel);

        let updated = store
            .update_photo(
                created.id,
                PhotoPatch {
                    description: Some("updated".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.description, "updated");
        assert_eq!(updated.title, "beach");

        assert!(store.delete_photo(created.id).await.unwrap());
        assert!(store.get_photo(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_filters_category_and_search() {
        let store = store().await;
        store
            .insert_photo(photo("beach", Category::Travel, "sunny"))
            .await
            .unwrap();
        store
            .insert_photo(photo("office", Category::Work, "new desk"))
            .await
            .unwrap();

        let travel = store
            .list_photos(&GalleryQuery {
                category: Some(Category::Travel),
                limit: 100,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].title, "beach");

        let searched = store
            .list_photos(&GalleryQuery {
                search: Some("desk".to_string()),
                limit: 100,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].title, "office");
    }

    #[tokio::test]
    async fn video_defaults_and_patch() {
        let store = store().await;
        let created = store
            .insert_video(NewVideo {
                title: "vlog".to_string(),
                file_path: String::new(),
                embed_link: "https://example.com/v/1".to_string(),
                category: Category::Life,
                description: String::new(),
                thumbnail: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(created.file_path, "");

        let updated = store
            .update_video(
                created.id,
                VideoPatch {
                    thumbnail: Some("thumbs/vlog.jpg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.thumbnail, "thumbs/vlog.jpg");
        assert_eq!(updated.embed_link, "https://example.com/v/1");
    }

    #[tokio::test]
    async fn stats_count_distinct_categories() {
        let store = store().await;
        store
            .insert_photo(photo("a", Category::Travel, ""))
            .await
            .unwrap();
        store
            .insert_photo(photo("b", Category::Travel, ""))
            .await
            .unwrap();
        store
            .insert_photo(photo("c", Category::Work, ""))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.photos, 3);
        assert_eq!(stats.videos, 0);
        assert_eq!(stats.photo_categories, 2);
        assert_eq!(stats.video_categories, 0);
    }
}
