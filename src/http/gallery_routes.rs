// Gallery routes - photo/video CRUD plus the directory-scanned wall,
// weibo and hero listings. Mutations are admin-gated, reads are public.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::core::gallery::{
    Category, FeaturedContent, GalleryQuery, GalleryStats, NewPhoto, NewVideo, Photo, PhotoPatch,
    Video, VideoPatch, WallPhoto,
};
use crate::http::error::ApiError;
use crate::http::extract::AdminKey;
use crate::http::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/photos", get(list_photos).post(create_photo))
        .route(
            "/photos/{id}",
            get(get_photo).put(update_photo).delete(delete_photo),
        )
        .route("/videos", get(list_videos).post(create_video))
        .route(
            "/videos/{id}",
            get(get_video).put(update_video).delete(delete_video),
        )
        .route("/featured", get(featured))
        .route("/stats", get(stats))
        .route("/wall-photos", get(wall_photos))
        .route("/weibo-photos", get(weibo_photos))
        .route("/random-hero", get(random_hero))
}

fn default_gallery_limit() -> u32 {
    100
}

#[derive(Debug, Deserialize)]
struct ListParams {
    category: Option<Category>,
    search: Option<String>,
    #[serde(default)]
    skip: u32,
    #[serde(default = "default_gallery_limit")]
    limit: u32,
}

impl From<ListParams> for GalleryQuery {
    fn from(p: ListParams) -> Self {
        GalleryQuery {
            category: p.category,
            search: p.search,
            skip: p.skip,
            limit: p.limit,
        }
    }
}

// ============================================================================
// PHOTOS
// ============================================================================

async fn list_photos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    Ok(Json(state.gallery.list_photos(params.into()).await?))
}

async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Photo>, ApiError> {
    Ok(Json(state.gallery.get_photo(id).await?))
}

async fn create_photo(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(new): Json<NewPhoto>,
) -> Result<Json<Photo>, ApiError> {
    Ok(Json(state.gallery.create_photo(new).await?))
}

async fn update_photo(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PhotoPatch>,
) -> Result<Json<Photo>, ApiError> {
    Ok(Json(state.gallery.update_photo(id, patch).await?))
}

async fn delete_photo(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.gallery.delete_photo(id).await?;
    Ok(Json(json!({ "message": "Photo deleted" })))
}

// ============================================================================
// VIDEOS
// ============================================================================

async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Video>>, ApiError> {
    Ok(Json(state.gallery.list_videos(params.into()).await?))
}

async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Video>, ApiError> {
    Ok(Json(state.gallery.get_video(id).await?))
}

async fn create_video(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(new): Json<NewVideo>,
) -> Result<Json<Video>, ApiError> {
    Ok(Json(state.gallery.create_video(new).await?))
}

async fn update_video(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<VideoPatch>,
) -> Result<Json<Video>, ApiError> {
    Ok(Json(state.gallery.update_video(id, patch).await?))
}

async fn delete_video(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.gallery.delete_video(id).await?;
    Ok(Json(json!({ "message": "Video deleted" })))
}

// ============================================================================
// AGGREGATES AND SCANNED LISTINGS
// ============================================================================

async fn featured(State(state): State<AppState>) -> Result<Json<FeaturedContent>, ApiError> {
    Ok(Json(state.gallery.featured().await?))
}

async fn stats(State(state): State<AppState>) -> Result<Json<GalleryStats>, ApiError> {
    Ok(Json(state.gallery.stats().await?))
}

#[derive(Debug, serde::Serialize)]
struct WallPhotosResponse {
    photos: Vec<WallPhoto>,
}

async fn wall_photos(State(state): State<AppState>) -> Result<Json<WallPhotosResponse>, ApiError> {
    Ok(Json(WallPhotosResponse {
        photos: state.gallery.wall_photos().await?,
    }))
}

async fn weibo_photos(State(state): State<AppState>) -> Result<Json<WallPhotosResponse>, ApiError> {
    Ok(Json(WallPhotosResponse {
        photos: state.gallery.weibo_photos().await?,
    }))
}

async fn random_hero(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let url = state.gallery.random_hero().await?;
    Ok(Json(json!({ "image_url": url })))
}
