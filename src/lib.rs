//! Interactive yt-dlp search and download prompt.
//!
//! [`flow::ResolutionFlow`] holds the only real logic. It turns free text into
//! a [`downloader::DownloadRequest`] and hands it to a
//! [`downloader::MediaCollaborator`]. [`downloader::backends::YtDlpBackend`]
//! drives the real tool; [`downloader::backends::InMemoryCollaborator`] stands
//! in for it in tests.

pub mod downloader;
pub mod flow;
pub mod table;

pub use downloader::backends::{InMemoryCollaborator, YtDlpBackend};
pub use downloader::{
    CandidateItem, DownloadError, DownloadOptions, DownloadRequest, ExtractorConfig, FormatOption,
    FormatSelection, MediaCollaborator, ProbeResult,
};
pub use flow::{FlowError, FlowOptions, FlowOutcome, ResolutionFlow, ScriptedTerminal, StdioTerminal};
pub use table::GridTable;
