use std::fs;
use std::path::{Path, PathBuf};

/// Directory that receives raw uploads.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create the store, making the directory if it does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under `file_name`, replacing any earlier upload with the
    /// same name. `file_name` must already be a bare file name.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
