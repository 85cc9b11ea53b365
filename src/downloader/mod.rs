// Downloader module - collaborator abstraction and format selection

pub mod backends;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod format_selector;
pub mod models;
pub mod progress;
pub mod request;
pub mod traits;
pub mod utils;

pub use config::ExtractorConfig;
pub use errors::DownloadError;
pub use format_selector::{FormatSelector, SelectionError};
pub use models::{
    CandidateItem, DownloadOptions, DownloadProgress, FormatOption, FormatSelection, ProbeResult,
};
pub use request::DownloadRequest;
pub use traits::MediaCollaborator;
