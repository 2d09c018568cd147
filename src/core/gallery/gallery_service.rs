// Gallery service - photo/video metadata plus the filesystem-backed
// wall, weibo and hero listings.
//
// Metadata CRUD goes through the GalleryStore port; directory scanning goes
// through the MediaLibrary port so the service never touches the fs itself.

use super::filename_dates::date_from_filename;
use super::gallery_models::{
    FeaturedContent, GalleryQuery, GalleryStats, NewPhoto, NewVideo, Photo, PhotoPatch, Video,
    VideoPatch, WallPhoto,
};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use thiserror::Error;

/// Subdirectory of the media root scanned for the photo wall.
const WALL_DIR: &str = "wall-pic";
/// Subdirectory scanned for the weibo archive listing.
const WEIBO_DIR: &str = "weibo-pic";
/// Subdirectory the random hero image is picked from.
const HERO_DIR: &str = "pic";

const FEATURED_PHOTOS: u32 = 6;
const FEATURED_VIDEOS: u32 = 4;
const MAX_LIST_LIMIT: u32 = 1000;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("media error: {0}")]
    Media(String),
}

/// Trait for persisting gallery metadata.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn list_photos(&self, query: &GalleryQuery) -> Result<Vec<Photo>, GalleryError>;
    async fn get_photo(&self, id: i64) -> Result<Option<Photo>, GalleryError>;
    async fn insert_photo(&self, new: NewPhoto) -> Result<Photo, GalleryError>;
    async fn update_photo(&self, id: i64, patch: PhotoPatch)
        -> Result<Option<Photo>, GalleryError>;
    async fn delete_photo(&self, id: i64) -> Result<bool, GalleryError>;

    async fn list_videos(&self, query: &GalleryQuery) -> Result<Vec<Video>, GalleryError>;
    async fn get_video(&self, id: i64) -> Result<Option<Video>, GalleryError>;
    async fn insert_video(&self, new: NewVideo) -> Result<Video, GalleryError>;
    async fn update_video(&self, id: i64, patch: VideoPatch)
        -> Result<Option<Video>, GalleryError>;
    async fn delete_video(&self, id: i64) -> Result<bool, GalleryError>;

    async fn stats(&self) -> Result<GalleryStats, GalleryError>;
}

/// Trait for listing image files under the media root.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Image filenames in `<media_root>/<subdir>`, unordered.
    /// Fails with `NotFound` when the directory does not exist.
    async fn list_images(&self, subdir: &str) -> Result<Vec<String>, GalleryError>;
}

pub struct GalleryService<S: GalleryStore, M: MediaLibrary> {
    store: S,
    media: M,
    /// URL prefix the static file server exposes the media root under.
    media_url: String,
}

impl<S: GalleryStore, M: MediaLibrary> GalleryService<S, M> {
    pub fn new(store: S, media: M, media_url: String) -> Self {
        Self {
            store,
            media,
            media_url,
        }
    }

    fn media_url_for(&self, subdir: &str, filename: &str) -> String {
        format!("{}{}/{}", self.media_url, subdir, filename)
    }

    // ------------------------------------------------------------------
    // Photo / video metadata
    // ------------------------------------------------------------------

    pub async fn list_photos(&self, mut query: GalleryQuery) -> Result<Vec<Photo>, GalleryError> {
        query.limit = query.limit.clamp(1, MAX_LIST_LIMIT);
        self.store.list_photos(&query).await
    }

    pub async fn get_photo(&self, id: i64) -> Result<Photo, GalleryError> {
        self.store
            .get_photo(id)
            .await?
            .ok_or(GalleryError::NotFound("photo"))
    }

    pub async fn create_photo(&self, new: NewPhoto) -> Result<Photo, GalleryError> {
        self.store.insert_photo(new).await
    }

    pub async fn update_photo(&self, id: i64, patch: PhotoPatch) -> Result<Photo, GalleryError> {
        self.store
            .update_photo(id, patch)
            .await?
            .ok_or(GalleryError::NotFound("photo"))
    }

    pub async fn delete_photo(&self, id: i64) -> Result<(), GalleryError> {
        if !self.store.delete_photo(id).await? {
            return Err(GalleryError::NotFound("photo"));
        }
        Ok(())
    }

    pub async fn list_videos(&self, mut query: GalleryQuery) -> Result<Vec<Video>, GalleryError> {
        query.limit = query.limit.clamp(1, MAX_LIST_LIMIT);
        self.store.list_videos(&query).await
    }

    pub async fn get_video(&self, id: i64) -> Result<Video, GalleryError> {
        self.store
            .get_video(id)
            .await?
            .ok_or(GalleryError::NotFound("video"))
    }

    pub async fn create_video(&self, new: NewVideo) -> Result<Video, GalleryError> {
        self.store.insert_video(new).await
    }

    pub async fn update_video(&self, id: i64, patch: VideoPatch) -> Result<Video, GalleryError> {
        self.store
            .update_video(id, patch)
            .await?
            .ok_or(GalleryError::NotFound("video"))
    }

    pub async fn delete_video(&self, id: i64) -> Result<(), GalleryError> {
        if !self.store.delete_video(id).await? {
            return Err(GalleryError::NotFound("video"));
        }
        Ok(())
    }

    /// Homepage teaser: a handful of recent photos and videos.
    pub async fn featured(&self) -> Result<FeaturedContent, GalleryError> {
        let photos = self
            .store
            .list_photos(&GalleryQuery {
                limit: FEATURED_PHOTOS,
                ..Default::default()
            })
            .await?;
        let videos = self
            .store
            .list_videos(&GalleryQuery {
                limit: FEATURED_VIDEOS,
                ..Default::default()
            })
            .await?;
        Ok(FeaturedContent { photos, videos })
    }

    pub async fn stats(&self) -> Result<GalleryStats, GalleryError> {
        self.store.stats().await
    }

    // ------------------------------------------------------------------
    // Filesystem-backed listings
    // ------------------------------------------------------------------

    /// Photo wall: every image in the wall directory, shuffled per request.
    pub async fn wall_photos(&self) -> Result<Vec<WallPhoto>, GalleryError> {
        let mut files = self.media.list_images(WALL_DIR).await?;
        files.shuffle(&mut rand::thread_rng());
        Ok(files
            .into_iter()
            .map(|filename| WallPhoto {
                url: self.media_url_for(WALL_DIR, &filename),
                filename,
            })
            .collect())
    }

    /// Weibo archive: images sorted by filename date, newest first.
    /// Undated files sort after dated ones, alphabetically.
    pub async fn weibo_photos(&self) -> Result<Vec<WallPhoto>, GalleryError> {
        let mut files = self.media.list_images(WEIBO_DIR).await?;
        files.sort_by(|a, b| {
            match (date_from_filename(a), date_from_filename(b)) {
                (Some(da), Some(db)) => db.cmp(&da).then_with(|| a.cmp(b)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.cmp(b),
            }
        });
        Ok(files
            .into_iter()
            .map(|filename| WallPhoto {
                url: self.media_url_for(WEIBO_DIR, &filename),
                filename,
            })
            .collect())
    }

    /// One random image URL for the landing-page hero section.
    pub async fn random_hero(&self) -> Result<String, GalleryError> {
        let files = self.media.list_images(HERO_DIR).await?;
        let picked = files
            .choose(&mut rand::thread_rng())
            .ok_or(GalleryError::NotFound("hero image"))?;
        Ok(self.media_url_for(HERO_DIR, picked))
    }
}
