//! Collaborators used by terminal actions: attachment download and document generation.

use crate::error::Result;
use crate::types::{Attachment, User};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Resolves an [`Attachment`] reference to a local file.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    /// Downloads the attachment to `destination` and returns the written path.
    async fn fetch(&self, attachment: &Attachment, destination: &Path) -> Result<PathBuf>;
}

/// Produces an output artifact from collected answers.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// `answers` are the free-text answers in dialogue order; returns the artifact path.
    async fn generate(&self, user: &User, answers: &[String], attachment: &Path) -> Result<PathBuf>;
}
