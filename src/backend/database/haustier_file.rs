use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::HaustierFile;

pub const DEFAULT_MIMETYPE: &str = "image/png";

/// Common trait for attachment storage across different database backends
#[async_trait]
pub trait HaustierFileStore: Send + Sync {
    async fn fetch_file(&self, haustier_id: i64) -> AppResult<Option<HaustierFile>>;

    /// Delete a previous file of the pet and insert the new one in one transaction
    async fn execute_file_replace(&self, haustier_id: i64, file: HaustierFile) -> AppResult<()>;
}

pub struct HaustierFileProcessor;

impl HaustierFileProcessor {
    /// Normalize an uploaded file before storage
    ///
    /// Client-side directories are stripped from the filename and a missing
    /// mimetype falls back to `image/png`.
    pub fn prepare_file(file: &HaustierFile) -> AppResult<HaustierFile> {
        let filename = file
            .filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        if filename.is_empty() {
            return Err(AppError::BadRequest("Der Dateiname fehlt".to_string()));
        }

        let mimetype = match file.mimetype.trim() {
            "" => DEFAULT_MIMETYPE.to_string(),
            m => m.to_string(),
        };

        Ok(HaustierFile {
            id: None,
            filename,
            mimetype,
            data: file.data.clone(),
        })
    }
}

/// Unified attachment operations handler
pub struct UnifiedHaustierFileOps<T: HaustierFileStore> {
    store: T,
}

impl<T: HaustierFileStore> UnifiedHaustierFileOps<T> {
    pub fn new(store: T) -> Self {
        Self { store }
    }

    pub async fn find_file_by_haustier_id(&self, haustier_id: i64) -> AppResult<Option<HaustierFile>> {
        self.store.fetch_file(haustier_id).await
    }

    pub async fn replace_file(&self, haustier_id: i64, file: &HaustierFile) -> AppResult<()> {
        let prepared = HaustierFileProcessor::prepare_file(file)?;
        tracing::debug!("replace_file: haustier_id={}, file={:?}", haustier_id, prepared);
        self.store.execute_file_replace(haustier_id, prepared).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(filename: &str, mimetype: &str) -> HaustierFile {
        HaustierFile {
            id: Some(4),
            filename: filename.to_string(),
            mimetype: mimetype.to_string(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_prepare_file_strips_directories() {
        let prepared = HaustierFileProcessor::prepare_file(&file("C:\\bilder\\bello.jpg", "image/jpeg")).unwrap();
        assert_eq!(prepared.filename, "bello.jpg");
        assert_eq!(prepared.mimetype, "image/jpeg");
        assert_eq!(prepared.id, None);

        let prepared = HaustierFileProcessor::prepare_file(&file("/tmp/a/b.png", "")).unwrap();
        assert_eq!(prepared.filename, "b.png");
        assert_eq!(prepared.mimetype, DEFAULT_MIMETYPE);
    }

    #[test]
    fn test_prepare_file_requires_name() {
        assert!(HaustierFileProcessor::prepare_file(&file("dir/", "image/png")).is_err());
    }
}
