// Timeline routes - life-track events for the about page.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::timeline::{
    EventType, NewTimelineEvent, TimelineEvent, TimelineEventPatch, TimelineQuery, TimelineStats,
};
use crate::http::error::ApiError;
use crate::http::extract::AdminKey;
use crate::http::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/featured", get(featured_events))
        .route("/stats", get(timeline_stats))
}

fn default_timeline_limit() -> u32 {
    100
}

#[derive(Debug, Deserialize)]
struct ListParams {
    event_type: Option<EventType>,
    is_featured: Option<bool>,
    search: Option<String>,
    #[serde(default)]
    skip: u32,
    #[serde(default = "default_timeline_limit")]
    limit: u32,
}

async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TimelineEvent>>, ApiError> {
    let events = state
        .timeline
        .list(TimelineQuery {
            event_type: params.event_type,
            is_featured: params.is_featured,
            search: params.search,
            skip: params.skip,
            limit: params.limit,
        })
        .await?;
    Ok(Json(events))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TimelineEvent>, ApiError> {
    Ok(Json(state.timeline.get(id).await?))
}

async fn create_event(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(new): Json<NewTimelineEvent>,
) -> Result<Json<TimelineEvent>, ApiError> {
    Ok(Json(state.timeline.create(new).await?))
}

async fn update_event(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TimelineEventPatch>,
) -> Result<Json<TimelineEvent>, ApiError> {
    Ok(Json(state.timeline.update(id, patch).await?))
}

async fn delete_event(
    _admin: AdminKey,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.timeline.delete(id).await?;
    Ok(Json(json!({ "message": "Event deleted" })))
}

#[derive(Debug, Serialize)]
struct FeaturedEvents {
    events: Vec<TimelineEvent>,
}

async fn featured_events(State(state): State<AppState>) -> Result<Json<FeaturedEvents>, ApiError> {
    Ok(Json(FeaturedEvents {
        events: state.timeline.featured().await?,
    }))
}

async fn timeline_stats(State(state): State<AppState>) -> Result<Json<TimelineStats>, ApiError> {
    Ok(Json(state.timeline.stats().await?))
}
