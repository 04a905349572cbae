//! Local-disk file store for photos and warranty attachments. Buckets are
//! subdirectories under the configured root; stored files are served
//! read-only at `/files/{bucket}/{path}` by the web layer.

use crate::errors::LodgeError;
use std::path::{Component, Path, PathBuf};

#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
    base_url: String,
}

impl FileStore {
    pub fn new(root: PathBuf, base_url: String) -> Self {
        Self { root, base_url }
    }

    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf, LodgeError> {
        if !is_safe_segment(bucket) {
            return Err(LodgeError::Validation(format!("invalid bucket: {bucket}")));
        }
        if path.is_empty() || !is_safe_path(path) {
            return Err(LodgeError::Validation(format!("invalid file path: {path}")));
        }
        Ok(self.root.join(bucket).join(path))
    }

    /// Write one file. Each upload is an independent operation: a failure
    /// here never affects other files in the caller's batch.
    pub async fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<(), LodgeError> {
        let target = self.resolve(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        tracing::debug!(%bucket, %path, size = bytes.len(), "Stored file");
        Ok(())
    }

    /// Public URL for a stored file.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/files/{}/{}", self.base_url, bucket, path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && segment != "."
        && segment != ".."
}

fn is_safe_path(path: &str) -> bool {
    let p = Path::new(path);
    p.components().all(|c| match c {
        Component::Normal(seg) => seg.to_str().is_some_and(is_safe_segment),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileStore {
        FileStore::new(
            dir.path().to_path_buf(),
            "http://localhost:8080".to_string(),
        )
    }

    #[tokio::test]
    async fn test_upload_and_read_back() {
        let dir = TempDir::new().expect("temp dir");
        let files = store(&dir);

        files
            .upload("photos", "report-1/front-door.jpg", b"jpeg-bytes")
            .await
            .expect("upload");

        let written = std::fs::read(dir.path().join("photos/report-1/front-door.jpg"))
            .expect("read back");
        assert_eq!(written, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = TempDir::new().expect("temp dir");
        let files = store(&dir);

        assert!(files
            .upload("photos", "../escape.jpg", b"x")
            .await
            .is_err());
        assert!(files.upload("photos", "/etc/passwd", b"x").await.is_err());
        assert!(files.upload("..", "a.jpg", b"x").await.is_err());
        assert!(files.upload("photos", "", b"x").await.is_err());
    }

    #[test]
    fn test_public_url() {
        let dir = TempDir::new().expect("temp dir");
        let files = store(&dir);
        assert_eq!(
            files.public_url("attachments", "w1/receipt.pdf"),
            "http://localhost:8080/files/attachments/w1/receipt.pdf"
        );
    }
}
