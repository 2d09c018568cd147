// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "guestbook/mod.rs"]
pub mod guestbook;

#[path = "gallery/mod.rs"]
pub mod gallery;

#[path = "timeline/timeline_service.rs"]
pub mod timeline;
