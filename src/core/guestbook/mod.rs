// Core guestbook module - message submission, spam scoring and moderation.
// Following the same layout as the gallery module.

pub mod guestbook_models;
pub mod guestbook_service;
pub mod spam_scorer;

pub use guestbook_models::*;
pub use guestbook_service::*;
