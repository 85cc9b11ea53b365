// Failure diagnostics - turns yt-dlp error text into a user hint
//
// Only used to explain a fatal error before the process exits; nothing here
// retries or recovers.

use super::errors::DownloadError;

/// Why the media site (or yt-dlp) refused to cooperate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// HTTP 403 Forbidden
    Http403Forbidden,
    /// 429 or similar throttling
    RateLimited,
    /// Bot check / captcha
    BotDetection,
    /// Needs a logged-in adult account
    AgeRestricted,
    /// Not available in this country
    GeoBlocked,
    /// Private video requiring authorization
    PrivateVideo,
    /// Deleted or otherwise gone
    VideoUnavailable,
    /// DRM-protected, cannot be downloaded at all
    DrmProtected,
    /// Connection problems
    NetworkTimeout,
    /// yt-dlp itself is missing
    ToolMissing,
    Unknown,
}

impl BlockingReason {
    /// Short label
    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "HTTP 403 Forbidden",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geo-blocked content",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::NetworkTimeout => "Network timeout",
            Self::ToolMissing => "yt-dlp not installed",
            Self::Unknown => "Unknown error",
        }
    }

    /// What the user can try next
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Http403Forbidden | Self::BotDetection => {
                "Update yt-dlp, or pass browser cookies via YTDLP_COOKIES_FROM_BROWSER."
            }
            Self::RateLimited => "Wait a few minutes or use a different IP (YTDLP_PROXY).",
            Self::AgeRestricted | Self::PrivateVideo => {
                "Use cookies from an authorized account (YTDLP_COOKIES or YTDLP_COOKIES_FROM_BROWSER)."
            }
            Self::GeoBlocked => "Use a proxy in an allowed region (YTDLP_PROXY).",
            Self::VideoUnavailable => "The video may have been deleted or made private.",
            Self::DrmProtected => "DRM-protected media cannot be downloaded.",
            Self::NetworkTimeout => "Check your connection or set YTDLP_PROXY.",
            Self::ToolMissing => {
                "Install yt-dlp (pip install yt-dlp) or point YTDLP_PATH / YTDLP_PYTHON at it."
            }
            Self::Unknown => "Check the URL and try again.",
        }
    }

    /// No settings change can make this work
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::DrmProtected | Self::VideoUnavailable)
    }
}

/// Analyze error message and return blocking reason
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    let lower = error.to_lowercase();

    // Most specific patterns first
    if lower.contains("drm") || lower.contains("widevine") || lower.contains("playready") {
        return Some(BlockingReason::DrmProtected);
    }

    if lower.contains("tool not found")
        || lower.contains("no module named")
        || lower.contains("command not found")
    {
        return Some(BlockingReason::ToolMissing);
    }

    if lower.contains("age-restricted") || lower.contains("confirm your age") {
        return Some(BlockingReason::AgeRestricted);
    }

    if lower.contains("private video") || lower.contains("video is private") {
        return Some(BlockingReason::PrivateVideo);
    }

    if lower.contains("video unavailable")
        || lower.contains("has been removed")
        || lower.contains("no longer available")
    {
        return Some(BlockingReason::VideoUnavailable);
    }

    if lower.contains("not available in your country") || lower.contains("geo restrict") {
        return Some(BlockingReason::GeoBlocked);
    }

    if lower.contains("429") || lower.contains("too many requests") || lower.contains("rate limit") {
        return Some(BlockingReason::RateLimited);
    }

    if lower.contains("not a bot") || lower.contains("captcha") || lower.contains("unusual traffic") {
        return Some(BlockingReason::BotDetection);
    }

    if lower.contains("403") || lower.contains("forbidden") {
        return Some(BlockingReason::Http403Forbidden);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network is unreachable")
    {
        return Some(BlockingReason::NetworkTimeout);
    }

    if !error.trim().is_empty() {
        return Some(BlockingReason::Unknown);
    }

    None
}

/// One line explaining a collaborator failure, `None` when nothing is known
pub fn failure_hint(error: &DownloadError) -> Option<String> {
    let reason = diagnose_error(&error.to_string())?;
    let mut hint = format!("Detected: {}. {}", reason.description(), reason.hint());
    if reason.is_permanent() {
        hint.push_str(" This cannot be fixed by changing settings.");
    }
    Some(hint)
}
