pub mod fs_media_library;
pub mod sqlite_gallery_store;

pub use fs_media_library::FsMediaLibrary;
pub use sqlite_gallery_store::SqliteGalleryStore;
