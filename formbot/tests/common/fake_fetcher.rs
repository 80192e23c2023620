//! [`formbot_core::AttachmentFetcher`] that writes placeholder bytes instead of downloading.

use async_trait::async_trait;
use formbot_core::{Attachment, AttachmentFetcher, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeFetcher {
    fetched: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(file_id, destination)` of every fetch, in order.
    pub fn fetched(&self) -> Vec<(String, PathBuf)> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttachmentFetcher for FakeFetcher {
    async fn fetch(&self, attachment: &Attachment, destination: &Path) -> Result<PathBuf> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(destination, b"jpeg").await?;
        self.fetched
            .lock()
            .unwrap()
            .push((attachment.file_id.clone(), destination.to_path_buf()));
        Ok(destination.to_path_buf())
    }
}
