// Gallery domain models - photos, videos and the wall/hero listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content category shared by photos and videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Travel,
    Family,
    Life,
    Work,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Travel => "travel",
            Category::Family => "family",
            Category::Life => "life",
            Category::Work => "work",
            Category::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "travel" => Some(Category::Travel),
            "family" => Some(Category::Family),
            "life" => Some(Category::Life),
            "work" => Some(Category::Work),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Life
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub category: Category,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPhoto {
    pub title: String,
    pub file_path: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub embed_link: String,
    pub category: Category,
    pub description: String,
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVideo {
    pub title: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub embed_link: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub file_path: Option<String>,
    pub embed_link: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

/// Listing filter shared by the photo and video endpoints.
#[derive(Debug, Clone, Default)]
pub struct GalleryQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub skip: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedContent {
    pub photos: Vec<Photo>,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryStats {
    pub photos: i64,
    pub videos: i64,
    pub photo_categories: i64,
    pub video_categories: i64,
}

/// One scanned file from a media subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WallPhoto {
    pub filename: String,
    pub url: String,
}
