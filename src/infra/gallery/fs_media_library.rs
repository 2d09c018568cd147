// Filesystem media library - scans subdirectories of the media root for
// image files. The same tree is served statically under /media.

use crate::core::gallery::{GalleryError, MediaLibrary};
use async_trait::async_trait;
use std::path::PathBuf;

/// Extensions accepted as wall/hero images.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

pub struct FsMediaLibrary {
    root: PathBuf,
}

impl FsMediaLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn is_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[async_trait]
impl MediaLibrary for FsMediaLibrary {
    async fn list_images(&self, subdir: &str) -> Result<Vec<String>, GalleryError> {
        let dir = self.root.join(subdir);
        if !dir.is_dir() {
            return Err(GalleryError::NotFound("media directory"));
        }

        // Directory listings are small; a blocking read_dir inside the
        // request is fine here.
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| GalleryError::Media(format!("{}: {e}", dir.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GalleryError::Media(e.to_string()))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_image(name) {
                    files.push(name.to_string());
                }
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_only_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let wall = dir.path().join("wall-pic");
        std::fs::create_dir(&wall).unwrap();
        std::fs::write(wall.join("a.jpg"), b"").unwrap();
        std::fs::write(wall.join("B.PNG"), b"").unwrap();
        std::fs::write(wall.join("notes.txt"), b"").unwrap();

        let library = FsMediaLibrary::new(dir.path());
        let mut files = library.list_images("wall-pic").await.unwrap();
        files.sort();
        assert_eq!(files, vec!["B.PNG", "a.jpg"]);
    }

    #[tokio::test]
    async fn missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let library = FsMediaLibrary::new(dir.path());
        assert!(matches!(
            library.list_images("wall-pic").await.unwrap_err(),
            GalleryError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn subdirectories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let pic = dir.path().join("pic");
        std::fs::create_dir_all(pic.join("nested.jpg")).unwrap();
        std::fs::write(pic.join("real.jpg"), b"").unwrap();

        let library = FsMediaLibrary::new(dir.path());
        let files = library.list_images("pic").await.unwrap();
        assert_eq!(files, vec!["real.jpg"]);
    }
}
