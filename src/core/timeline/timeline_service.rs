// Timeline service - life-track events shown on the about page.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FEATURED_EVENTS: u32 = 5;
const MAX_LIST_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Milestone,
    Achievement,
    Travel,
    Work,
    Education,
    Family,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Milestone => "milestone",
            EventType::Achievement => "achievement",
            EventType::Travel => "travel",
            EventType::Work => "work",
            EventType::Education => "education",
            EventType::Family => "family",
            EventType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "milestone" => Some(EventType::Milestone),
            "achievement" => Some(EventType::Achievement),
            "travel" => Some(EventType::Travel),
            "work" => Some(EventType::Work),
            "education" => Some(EventType::Education),
            "family" => Some(EventType::Family),
            "other" => Some(EventType::Other),
            _ => None,
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Other
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_type: EventType,
    pub location: String,
    pub image: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTimelineEvent {
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineEventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineQuery {
    pub event_type: Option<EventType>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub skip: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStats {
    /// Distinct event years, newest first
    pub years: Vec<i32>,
    pub total_events: i64,
    pub featured_events: i64,
}

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("timeline event not found")]
    NotFound,
}

/// Trait for persisting timeline events.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Matching events ordered by event date descending.
    async fn list_events(&self, query: &TimelineQuery)
        -> Result<Vec<TimelineEvent>, TimelineError>;
    async fn get_event(&self, id: i64) -> Result<Option<TimelineEvent>, TimelineError>;
    async fn insert_event(&self, new: NewTimelineEvent) -> Result<TimelineEvent, TimelineError>;
    async fn update_event(
        &self,
        id: i64,
        patch: TimelineEventPatch,
    ) -> Result<Option<TimelineEvent>, TimelineError>;
    async fn delete_event(&self, id: i64) -> Result<bool, TimelineError>;
    async fn stats(&self) -> Result<TimelineStats, TimelineError>;
}

pub struct TimelineService<S: TimelineStore> {
    store: S,
}

impl<S: TimelineStore> TimelineService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self, mut query: TimelineQuery) -> Result<Vec<TimelineEvent>, TimelineError> {
        query.limit = query.limit.clamp(1, MAX_LIST_LIMIT);
        self.store.list_events(&query).await
    }

    pub async fn get(&self, id: i64) -> Result<TimelineEvent, TimelineError> {
        self.store
            .get_event(id)
            .await?
            .ok_or(TimelineError::NotFound)
    }

    pub async fn create(&self, new: NewTimelineEvent) -> Result<TimelineEvent, TimelineError> {
        self.store.insert_event(new).await
    }

    pub async fn update(
        &self,
        id: i64,
        patch: TimelineEventPatch,
    ) -> Result<TimelineEvent, TimelineError> {
        self.store
            .update_event(id, patch)
            .await?
            .ok_or(TimelineError::NotFound)
    }

    pub async fn delete(&self, id: i64) -> Result<(), TimelineError> {
        if !self.store.delete_event(id).await? {
            return Err(TimelineError::NotFound);
        }
        Ok(())
    }

    /// Featured events for the homepage.
    pub async fn featured(&self) -> Result<Vec<TimelineEvent>, TimelineError> {
        self.store
            .list_events(&TimelineQuery {
                is_featured: Some(true),
                limit: FEATURED_EVENTS,
                ..Default::default()
            })
            .await
    }

    pub async fn stats(&self) -> Result<TimelineStats, TimelineError> {
        self.store.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct MockTimelineStore {
        events: DashMap<i64, TimelineEvent>,
        next_id: AtomicI64,
    }

    impl MockTimelineStore {
        fn new() -> Self {
            Self {
                events: DashMap::new(),
                next_id: AtomicI64::new(1),
            }
        }
    }

    #[async_trait]
    impl TimelineStore for MockTimelineStore {
        async fn list_events(
            &self,
            query: &TimelineQuery,
        ) -> Result<Vec<TimelineEvent>, TimelineError> {
            let mut out: Vec<TimelineEvent> = self
                .events
                .iter()
                .filter(|e| query.event_type.map_or(true, |t| e.event_type == t))
                .filter(|e| query.is_featured.map_or(true, |f| e.is_featured == f))
                .filter(|e| {
                    query.search.as_ref().map_or(true, |s| {
                        e.title.contains(s.as_str())
                            || e.description.contains(s.as_str())
                            || e.location.contains(s.as_str())
                    })
                })
                .map(|e| e.clone())
                .collect();
            out.sort_by(|a, b| b.event_date.cmp(&a.event_date));
            Ok(out
                .into_iter()
                .skip(query.skip as usize)
                .take(query.limit as usize)
                .collect())
        }

        async fn get_event(&self, id: i64) -> Result<Option<TimelineEvent>, TimelineError> {
            Ok(self.events.get(&id).map(|e| e.clone()))
        }

        async fn insert_event(
            &self,
            new: NewTimelineEvent,
        ) -> Result<TimelineEvent, TimelineError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let now = Utc::now();
            let event = TimelineEvent {
                id,
                title: new.title,
                description: new.description,
                event_date: new.event_date,
                event_type: new.event_type,
                location: new.location,
                image: new.image,
                is_featured: new.is_featured,
                created_at: now,
                updated_at: now,
            };
            self.events.insert(id, event.clone());
            Ok(event)
        }

        async fn update_event(
            &self,
            id: i64,
            patch: TimelineEventPatch,
        ) -> Result<Option<TimelineEvent>, TimelineError> {
            match self.events.get_mut(&id) {
                Some(mut e) => {
                    if let Some(title) = patch.title {
                        e.title = title;
                    }
                    if let Some(description) = patch.description {
                        e.description = description;
                    }
                    if let Some(event_date) = patch.event_date {
                        e.event_date = event_date;
                    }
                    if let Some(event_type) = patch.event_type {
                        e.event_type = event_type;
                    }
                    if let Some(location) = patch.location {
                        e.location = location;
                    }
                    if let Some(image) = patch.image {
                        e.image = image;
                    }
                    if let Some(is_featured) = patch.is_featured {
                        e.is_featured = is_featured;
                    }
                    e.updated_at = Utc::now();
                    Ok(Some(e.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete_event(&self, id: i64) -> Result<bool, TimelineError> {
            Ok(self.events.remove(&id).is_some())
        }

        async fn stats(&self) -> Result<TimelineStats, TimelineError> {
            let mut years: Vec<i32> = self
                .events
                .iter()
                .map(|e| e.event_date.year())
                .collect::<std::collections::HashSet<_>>()
                .into_iter()
                .collect();
            years.sort_unstable_by(|a, b| b.cmp(a));
            let featured = self.events.iter().filter(|e| e.is_featured).count() as i64;
            Ok(TimelineStats {
                years,
                total_events: self.events.len() as i64,
                featured_events: featured,
            })
        }
    }

    fn event(title: &str, date: (i32, u32, u32), featured: bool) -> NewTimelineEvent {
        NewTimelineEvent {
            title: title.to_string(),
            description: format!("{title} description"),
            event_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            event_type: EventType::Other,
            location: String::new(),
            image: String::new(),
            is_featured: featured,
        }
    }

    #[tokio::test]
    async fn events_list_newest_first() {
        let service = TimelineService::new(MockTimelineStore::new());
        service.create(event("old", (2015, 3, 1), false)).await.unwrap();
        service.create(event("new", (2023, 9, 12), false)).await.unwrap();

        let listed = service
            .list(TimelineQuery {
                limit: 100,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed[0].title, "new");
        assert_eq!(listed[1].title, "old");
    }

    #[tokio::test]
    async fn featured_returns_only_flagged_events() {
        let service = TimelineService::new(MockTimelineStore::new());
        service.create(event("plain", (2020, 1, 1), false)).await.unwrap();
        service.create(event("big day", (2021, 6, 1), true)).await.unwrap();

        let featured = service.featured().await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].title, "big day");
    }

    #[tokio::test]
    async fn stats_years_sorted_descending() {
        let service = TimelineService::new(MockTimelineStore::new());
        service.create(event("a", (2019, 1, 1), false)).await.unwrap();
        service.create(event("b", (2023, 1, 1), true)).await.unwrap();
        service.create(event("c", (2023, 5, 1), false)).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.years, vec![2023, 2019]);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.featured_events, 1);
    }

    #[tokio::test]
    async fn missing_event_is_not_found() {
        let service = TimelineService::new(MockTimelineStore::new());
        assert!(matches!(
            service.get(42).await.unwrap_err(),
            TimelineError::NotFound
        ));
        assert!(matches!(
            service.delete(42).await.unwrap_err(),
            TimelineError::NotFound
        ));
    }

    #[tokio::test]
    async fn patch_updates_only_provided_fields() {
        let service = TimelineService::new(MockTimelineStore::new());
        let created = service
            .create(event("graduation", (2018, 7, 1), false))
            .await
            .unwrap();

        let updated = service
            .update(
                created.id,
                TimelineEventPatch {
                    is_featured: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_featured);
        assert_eq!(updated.title, "graduation");
    }
}
