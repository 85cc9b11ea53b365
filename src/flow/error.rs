//! Errors that end the interactive flow.

use thiserror::Error;

use crate::downloader::errors::DownloadError;
use crate::downloader::format_selector::SelectionError;

/// Every variant is fatal; the only recoverable condition (an empty search
/// result) never surfaces as an error.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid {field}: {input:?} is not a number")]
    InvalidNumber { field: &'static str, input: String },

    #[error("{field} must be at least 1")]
    NonPositive { field: &'static str },

    #[error("{field} {index} is out of range (1-{len})")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("cannot select format: {0}")]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Collaborator(#[from] DownloadError),

    #[error("input closed while waiting for {prompt:?}")]
    InputClosed { prompt: String },

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no results after {attempts} search attempts")]
    SearchAttemptsExhausted { attempts: usize },
}

impl FlowError {
    /// The collaborator failure behind this error, if any
    pub fn collaborator_error(&self) -> Option<&DownloadError> {
        match self {
            Self::Collaborator(e) => Some(e),
            _ => None,
        }
    }
}
