use crate::Result;
use std::path::{Path, PathBuf};

/// An uploaded file spooled to disk for the duration of one request.
///
/// The file name carries a fresh UUID, so concurrent uploads never collide
/// regardless of the client-supplied filename. Dropping the guard removes
/// the file, including on early returns from failed decode or inference.
pub struct SpooledUpload {
    path: PathBuf,
}

impl SpooledUpload {
    pub async fn write(spool_dir: &Path, bytes: &[u8]) -> Result<Self> {
        let path = spool_dir.join(format!("upload-{}.tmp", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Spooled {} bytes to {}", bytes.len(), path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpooledUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove spooled upload {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drop_removes_spooled_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let spooled = SpooledUpload::write(dir.path(), b"not an image")
                .await
                .unwrap();
            assert!(spooled.path().exists());
            spooled.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn concurrent_spools_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = SpooledUpload::write(dir.path(), b"a").await.unwrap();
        let b = SpooledUpload::write(dir.path(), b"b").await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
