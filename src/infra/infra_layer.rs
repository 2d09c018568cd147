// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "guestbook/sqlite_guestbook_store.rs"]
pub mod guestbook;

#[path = "gallery/mod.rs"]
pub mod gallery;

#[path = "timeline/sqlite_timeline_store.rs"]
pub mod timeline;
