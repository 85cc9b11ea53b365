//! In-memory collaborator for exercising the flow without yt-dlp.
//!
//! Search answers are queued and handed out one per call; once the queue is
//! empty every further search returns no results. All calls are recorded so
//! tests can assert on what the flow asked for.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{CandidateItem, DownloadOptions, ProbeResult};
use crate::downloader::traits::MediaCollaborator;

pub const MEMORY_SEARCH_PROVIDER: &str = "MemorySearch";

/// One recorded `search` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub count: usize,
}

/// One recorded `download` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCall {
    pub locator: String,
    pub options: DownloadOptions,
}

#[derive(Debug, Default)]
struct Recorded {
    probes: Vec<String>,
    searches: Vec<SearchCall>,
    downloads: Vec<DownloadCall>,
}

#[derive(Debug, Default)]
pub struct InMemoryCollaborator {
    handlers: HashMap<String, String>,
    sources: Vec<String>,
    search_results: Mutex<VecDeque<Vec<CandidateItem>>>,
    download_failure: Option<DownloadError>,
    recorded: Mutex<Recorded>,
}

impl InMemoryCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `probe(url)` report `handler` as the matching source
    pub fn with_handler(mut self, url: impl Into<String>, handler: impl Into<String>) -> Self {
        self.handlers.insert(url.into(), handler.into());
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Queue the answer for the next `search` call
    pub fn with_search_result(self, items: Vec<CandidateItem>) -> Self {
        self.lock_results().push_back(items);
        self
    }

    /// Make every `download` call fail
    pub fn with_download_failure(mut self, error: DownloadError) -> Self {
        self.download_failure = Some(error);
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.lock_recorded().probes.clone()
    }

    pub fn searches(&self) -> Vec<SearchCall> {
        self.lock_recorded().searches.clone()
    }

    pub fn downloads(&self) -> Vec<DownloadCall> {
        self.lock_recorded().downloads.clone()
    }

    fn lock_results(&self) -> std::sync::MutexGuard<'_, VecDeque<Vec<CandidateItem>>> {
        self.search_results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MediaCollaborator for InMemoryCollaborator {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn search_provider(&self) -> &str {
        MEMORY_SEARCH_PROVIDER
    }

    async fn probe(&self, url: &str) -> Result<ProbeResult, DownloadError> {
        self.lock_recorded().probes.push(url.to_string());

        Ok(match self.handlers.get(url) {
            Some(handler) => ProbeResult::matched(handler.clone()),
            None => ProbeResult::unsupported(),
        })
    }

    async fn search(&self, query: &str, count: usize) -> Result<Vec<CandidateItem>, DownloadError> {
        self.lock_recorded().searches.push(SearchCall {
            query: query.to_string(),
            count,
        });

        let mut items = self.lock_results().pop_front().unwrap_or_default();
        items.truncate(count);
        Ok(items)
    }

    async fn download(&self, locator: &str, options: &DownloadOptions) -> Result<(), DownloadError> {
        self.lock_recorded().downloads.push(DownloadCall {
            locator: locator.to_string(),
            options: options.clone(),
        });

        match &self.download_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn list_source_handlers(&self) -> Result<Vec<String>, DownloadError> {
        Ok(self.sources.clone())
    }
}
