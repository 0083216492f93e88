//! Per-request scratch storage for uploaded files.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::TempDir;
use tracing::debug;

const FALLBACK_FILE_NAME: &str = "upload";

/// A file received from a multipart field.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub data: Bytes,
}

/// A uniquely-named directory holding one request's uploads.
/// Removed from disk when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create(root: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix("optimize-").tempdir_in(root)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes the upload to `<scratch>/<field>/<file name>` and returns that path.
    pub async fn persist(&self, upload: &UploadedFile) -> std::io::Result<PathBuf> {
        let field_dir = self.dir.path().join(safe_component(&upload.field));
        tokio::fs::create_dir_all(&field_dir).await?;

        let path = field_dir.join(safe_component(&upload.file_name));
        tokio::fs::write(&path, &upload.data).await?;

        debug!("Stored {} ({} bytes)", path.display(), upload.data.len());
        Ok(path)
    }
}

/// Keeps only the final path component of a client-supplied name.
fn safe_component(name: &str) -> String {
    // Browsers on Windows may send `C:\Users\...\resume.pdf`.
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match last {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        other => other.to_string(),
    }
}
