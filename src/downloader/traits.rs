// Extraction collaborator trait definition

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{CandidateItem, DownloadOptions, ProbeResult};

/// Everything the interactive flow needs from the media-extraction tool
#[async_trait]
pub trait MediaCollaborator: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Source handler name used for keyword search
    fn search_provider(&self) -> &str;

    /// Classify a URL without downloading it. The generic fallback handler
    /// never counts as a match.
    async fn probe(&self, url: &str) -> Result<ProbeResult, DownloadError>;

    /// Up to `count` results for `query`. An empty list is not an error.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<CandidateItem>, DownloadError>;

    /// Download `locator` with the given options
    async fn download(&self, locator: &str, options: &DownloadOptions) -> Result<(), DownloadError>;

    /// Names of the supported source handlers, in collaborator order
    async fn list_source_handlers(&self) -> Result<Vec<String>, DownloadError>;
}
