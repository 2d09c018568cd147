// HTTP layer - axum routers and request handlers.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::gallery::GalleryService;
use crate::core::guestbook::GuestbookService;
use crate::core::timeline::TimelineService;
use crate::infra::gallery::{FsMediaLibrary, SqliteGalleryStore};
use crate::infra::guestbook::SqliteGuestbookStore;
use crate::infra::timeline::SqliteTimelineStore;

#[path = "error.rs"]
pub mod error;
#[path = "extract.rs"]
pub mod extract;

#[path = "gallery_routes.rs"]
pub mod gallery_routes;
#[path = "guestbook_routes.rs"]
pub mod guestbook_routes;
#[path = "timeline_routes.rs"]
pub mod timeline_routes;

// ============================================================================
// SHARED STATE
// ============================================================================

/// Everything a handler can reach. Cheap to clone, axum clones it per request.
#[derive(Clone)]
pub struct AppState {
    pub guestbook: Arc<GuestbookService<SqliteGuestbookStore>>,
    pub gallery: Arc<GalleryService<SqliteGalleryStore, FsMediaLibrary>>,
    pub timeline: Arc<TimelineService<SqliteTimelineStore>>,
    pub admin_api_key: String,
}

// ============================================================================
// ROUTER
// ============================================================================

/// Assemble the full application router. `media_root` is served verbatim
/// under `/media` so the wall and hero URLs resolve.
pub fn router(state: AppState, media_root: &Path) -> Router {
    let api = Router::new()
        .merge(guestbook_routes::routes())
        .nest("/gallery", gallery_routes::routes())
        .nest("/timeline", timeline_routes::routes());

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api", api)
        .nest_service("/media", ServeDir::new(media_root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Personal homepage API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Bind and serve until the process is stopped. The connect-info wrapper is
/// what lets handlers see the peer address when no proxy header is present.
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
