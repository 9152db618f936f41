//! Persistence and object-storage seams.

use async_trait::async_trait;
use tracing::error;

use vsum_models::NewSummary;
use vsum_storage::{DownloadedObject, S3Client};
use vsum_supabase::SummaryRepository;

use crate::error::{SummarizerError, SummarizerResult};

/// Destination for finished summaries.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Persist a summary and return its identifier.
    async fn save(&self, summary: &NewSummary) -> SummarizerResult<String>;
}

#[async_trait]
impl SummaryStore for SummaryRepository {
    async fn save(&self, summary: &NewSummary) -> SummarizerResult<String> {
        match self.create(summary).await {
            Ok(stored) => Ok(stored.id),
            Err(e) => {
                error!(video_id = %summary.video_id, error = %e, "Database error");
                Err(SummarizerError::persistence(e.to_string()))
            }
        }
    }
}

/// Source of uploaded video objects.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    async fn download(&self, key: &str) -> SummarizerResult<DownloadedObject>;
}

#[async_trait]
impl ObjectSource for S3Client {
    async fn download(&self, key: &str) -> SummarizerResult<DownloadedObject> {
        Ok(S3Client::download(self, key).await?)
    }
}
