use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Content types accepted for clothing photos, with the extension used on disk
pub const ALLOWED_CONTENT_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// Public URL prefix under which stored files are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Writes uploaded photos to a local directory
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
    max_size: usize,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>, max_size: usize) -> Self {
        Self {
            root: root.into(),
            max_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Checks size and type before anything touches the disk
    ///
    /// Returns the extension to store the file under.
    pub fn validate(&self, content_type: Option<&str>, size: usize) -> AppResult<&'static str> {
        if size > self.max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "Maximum upload size is {} bytes",
                self.max_size
            )));
        }

        let content_type = content_type.unwrap_or_default();
        ALLOWED_CONTENT_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                let allowed: Vec<&str> = ALLOWED_CONTENT_TYPES.iter().map(|(m, _)| *m).collect();
                AppError::UnsupportedMediaType(format!(
                    "'{}' is not supported; allowed types: {}",
                    content_type,
                    allowed.join(", ")
                ))
            })
    }

    /// Stores the photo as `<item_id>.<extension>` and returns its public URL
    pub async fn save(&self, item_id: Uuid, extension: &str, bytes: &[u8]) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!("{}.{}", item_id, extension);
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        tracing::debug!(%item_id, size = bytes.len(), file = %file_name, "Stored upload");
        Ok(format!("{}{}", UPLOADS_URL_PREFIX, file_name))
    }

    /// Deletes the file behind a public URL; a missing file is not an error
    pub async fn remove(&self, image_url: &str) -> AppResult<()> {
        let Some(file_name) = image_url.strip_prefix(UPLOADS_URL_PREFIX) else {
            return Ok(());
        };
        // never follow paths out of the upload directory
        if file_name.contains('/') || file_name.contains("..") {
            return Ok(());
        }

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> UploadStorage {
        UploadStorage::new(dir, 1024)
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("closet-api-uploads-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_validate() {
        let storage = storage(Path::new("unused"));
        assert_eq!(storage.validate(Some("image/png"), 10).unwrap(), "png");
        assert!(matches!(
            storage.validate(Some("image/png"), 2048),
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(matches!(
            storage.validate(Some("application/pdf"), 10),
            Err(AppError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            storage.validate(None, 10),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = temp_dir();
        let storage = storage(&dir);
        let id = Uuid::new_v4();

        let url = storage.save(id, "png", b"bytes").await.unwrap();
        assert_eq!(url, format!("/uploads/{}.png", id));
        assert!(dir.join(format!("{}.png", id)).exists());

        storage.remove(&url).await.unwrap();
        assert!(!dir.join(format!("{}.png", id)).exists());

        // second removal is a no-op
        storage.remove(&url).await.unwrap();
        let _ = std::fs::remove_dir_all(dir);
    }
}
