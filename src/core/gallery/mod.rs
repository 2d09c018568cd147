// Core gallery module - photo/video metadata and media-directory scanning.

pub mod filename_dates;
pub mod gallery_models;
pub mod gallery_service;

pub use gallery_models::*;
pub use gallery_service::*;
