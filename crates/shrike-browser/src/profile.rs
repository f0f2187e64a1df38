use crate::Result;
use std::path::{Path, PathBuf};

/// A unique throwaway Chrome user-data directory, removed on drop.
///
/// Every run gets its own directory so independent runs never collide on
/// Chrome's ProcessSingleton lock.
pub struct TempProfile {
    path: PathBuf,
}

impl TempProfile {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("shrike-profile-")
            .tempdir()?;

        Ok(Self {
            path: temp_dir.keep(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
