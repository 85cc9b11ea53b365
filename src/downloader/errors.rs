// Error types for the extraction collaborator

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// Network timeout while talking to the media site
    NetworkTimeout,

    /// The site refused the request (429, bot detection, 403, etc.)
    Blocked(String),

    /// yt-dlp or python not found in system
    ToolNotFound(String),

    /// No extractor accepts the URL
    UnsupportedUrl(String),

    /// Failed to parse yt-dlp JSON output
    ParseError(String),

    /// Command execution failed
    ExecutionError(String),

    /// Unknown error with details
    Unknown(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkTimeout => write!(f, "Network timeout: the media site is not responding"),
            Self::Blocked(msg) => write!(f, "Request blocked by the media site: {}", msg),
            Self::ToolNotFound(tool) => write!(f, "Tool not found: {}", tool),
            Self::UnsupportedUrl(url) => write!(f, "Unsupported URL: {}", url),
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Self::ExecutionError(msg) => write!(f, "Execution error: {}", msg),
            Self::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

// Classifies raw yt-dlp stderr
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("timeout") || lower.contains("timed out") {
            return Self::NetworkTimeout;
        }

        if lower.contains("429")
            || lower.contains("403")
            || lower.contains("sign in to confirm you")
            || lower.contains("blocked")
        {
            return Self::Blocked(s);
        }

        if lower.contains("unsupported url") || lower.contains("invalid url") {
            return Self::UnsupportedUrl(s);
        }

        // Spawn failures are built as ToolNotFound where they happen; a bare
        // "no such file" from a running yt-dlp is usually the output path.
        if lower.contains("command not found") || lower.contains("no module named") {
            return Self::ToolNotFound(s);
        }

        if lower.contains("json") {
            return Self::ParseError(s);
        }

        Self::Unknown(s)
    }
}

impl From<&str> for DownloadError {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}
