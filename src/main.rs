// This is the entry point of the homepage API server.
//
// **Architecture Overview:**
// - `core/` = Business logic (transport-agnostic)
// - `infra/` = Implementations of core traits (SQLite, filesystem)
// - `http/` = axum adapters (routes, extractors, error mapping)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Assemble the router and serve

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "http/http_layer.rs"]
mod http;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::gallery::GalleryService;
use crate::core::guestbook::{GuestbookConfig, GuestbookService};
use crate::core::timeline::TimelineService;
use crate::http::AppState;
use crate::infra::gallery::{FsMediaLibrary, SqliteGalleryStore};
use crate::infra::guestbook::SqliteGuestbookStore;
use crate::infra::timeline::SqliteTimelineStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Keep the runtime database in a dedicated folder so the repo root
    // stays tidy (matches the default DATABASE_URL).
    std::fs::create_dir_all("data")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await?;

    let guestbook_store = SqliteGuestbookStore::new(pool.clone());
    guestbook_store.migrate().await?;
    let guestbook = Arc::new(GuestbookService::new(
        guestbook_store,
        GuestbookConfig::default(),
    ));

    let gallery_store = SqliteGalleryStore::new(pool.clone());
    gallery_store.migrate().await?;
    let media = FsMediaLibrary::new(config.media_root.clone());
    let gallery = Arc::new(GalleryService::new(
        gallery_store,
        media,
        config.media_url.clone(),
    ));

    let timeline_store = SqliteTimelineStore::new(pool);
    timeline_store.migrate().await?;
    let timeline = Arc::new(TimelineService::new(timeline_store));

    let state = AppState {
        guestbook,
        gallery,
        timeline,
        admin_api_key: config.admin_api_key.clone(),
    };

    let app = http::router(state, &config.media_root);
    http::serve(config.bind_addr, app).await
}
