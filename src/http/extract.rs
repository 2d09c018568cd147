// Request extractors shared by the route modules.

use crate::http::error::ApiError;
use crate::http::AppState;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::net::SocketAddr;

// ============================================================================
// ADMIN KEY
// ============================================================================

/// Proof that the request carried the configured `X-Api-Key` header.
///
/// Adding this extractor to a handler is what gates it behind the admin
/// credential; there is no separate middleware.
pub struct AdminKey;

impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok());

        match provided {
            Some(key) if key == state.admin_api_key => Ok(AdminKey),
            _ => {
                tracing::warn!(path = %parts.uri.path(), "rejected admin request");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

// ============================================================================
// CLIENT IP
// ============================================================================

/// Best-effort client address, used for rate limiting and like dedup.
///
/// Prefers the first entry of `X-Forwarded-For` (set by the reverse proxy)
/// and falls back to the socket peer address.
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(ip) = forwarded {
            return Ok(ClientIp(ip));
        }

        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| ClientIp(addr.ip().to_string()))
            .ok_or_else(|| ApiError::Internal("client address unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gallery::GalleryService;
    use crate::core::guestbook::{GuestbookConfig, GuestbookService};
    use crate::core::timeline::TimelineService;
    use crate::infra::gallery::{FsMediaLibrary, SqliteGalleryStore};
    use crate::infra::guestbook::SqliteGuestbookStore;
    use crate::infra::timeline::SqliteTimelineStore;
    use axum::http::Request;
    use std::sync::Arc;

    async fn state(admin_api_key: &str) -> AppState {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let guestbook_store = SqliteGuestbookStore::new(pool.clone());
        guestbook_store.migrate().await.unwrap();
        let gallery_store = SqliteGalleryStore::new(pool.clone());
        gallery_store.migrate().await.unwrap();
        let timeline_store = SqliteTimelineStore::new(pool);
        timeline_store.migrate().await.unwrap();

        AppState {
            guestbook: Arc::new(GuestbookService::new(
                guestbook_store,
                GuestbookConfig::default(),
            )),
            gallery: Arc::new(GalleryService::new(
                gallery_store,
                FsMediaLibrary::new("/nonexistent"),
                "/media/".to_string(),
            )),
            timeline: Arc::new(TimelineService::new(timeline_store)),
            admin_api_key: admin_api_key.to_string(),
        }
    }

    fn parts(request: Request<()>) -> Parts {
        request.into_parts().0
    }

    #[tokio::test]
    async fn admin_key_requires_the_configured_secret() {
        let state = state("sekrit").await;

        let mut missing = parts(Request::builder().uri("/api/admin/messages").body(()).unwrap());
        assert!(AdminKey::from_request_parts(&mut missing, &state)
            .await
            .is_err());

        let mut wrong = parts(
            Request::builder()
                .uri("/api/admin/messages")
                .header("x-api-key", "guess")
                .body(())
                .unwrap(),
        );
        assert!(AdminKey::from_request_parts(&mut wrong, &state)
            .await
            .is_err());

        let mut right = parts(
            Request::builder()
                .uri("/api/admin/messages")
                .header("x-api-key", "sekrit")
                .body(())
                .unwrap(),
        );
        assert!(AdminKey::from_request_parts(&mut right, &state)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn client_ip_prefers_the_forwarded_header() {
        let mut parts = parts(
            Request::builder()
                .uri("/api/messages")
                .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
                .body(())
                .unwrap(),
        );
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(ip, "203.0.113.9");
    }

    #[tokio::test]
    async fn client_ip_falls_back_to_the_peer_address() {
        let mut parts = parts(Request::builder().uri("/api/messages").body(()).unwrap());
        parts
            .extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 7], 40000))));

        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(ip, "192.0.2.7");
    }
}
