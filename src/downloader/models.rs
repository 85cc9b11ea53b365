// Common data models for the downloader

use serde::Deserialize;

/// One encoded variant of a candidate (container + codecs + resolution).
/// Field names match the entries of yt-dlp's `formats` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormatOption {
    /// Format ID (e.g., "137", "140")
    #[serde(default)]
    pub format_id: String,
    /// File extension (mp4, webm, m4a)
    #[serde(default)]
    pub ext: String,
    /// Resolution string (e.g., "1920x1080", "audio only")
    pub resolution: Option<String>,
    /// Format note (e.g., "1080p", "medium")
    pub format_note: Option<String>,
    /// Video codec (avc1, vp9, av01, none)
    pub vcodec: Option<String>,
    /// Audio codec (mp4a, opus, none)
    pub acodec: Option<String>,
}

impl FormatOption {
    pub fn has_video(&self) -> bool {
        codec_present(self.vcodec.as_deref())
    }

    pub fn has_audio(&self) -> bool {
        codec_present(self.acodec.as_deref())
    }

    /// Video track and no audio track
    pub fn is_video_only(&self) -> bool {
        self.has_video() && !self.has_audio()
    }

    /// Audio track and no video track
    pub fn is_audio_only(&self) -> bool {
        self.has_audio() && !self.has_video()
    }

    /// Resolution for display; yt-dlp reports missing values as "none"
    pub fn resolution_label(&self) -> &str {
        self.resolution.as_deref().unwrap_or("none")
    }

    pub fn note_label(&self) -> &str {
        self.format_note.as_deref().unwrap_or("")
    }
}

fn codec_present(codec: Option<&str>) -> bool {
    codec.map_or(false, |c| !c.is_empty() && c != "none")
}

/// One search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub title: String,
    /// Playable page URL handed back to the downloader
    pub webpage_url: String,
    /// Ordered worst -> best
    pub formats: Vec<FormatOption>,
}

/// Outcome of classifying a URL without downloading it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub supported: bool,
    /// Extractor key of the first matching non-generic handler
    pub source: Option<String>,
}

impl ProbeResult {
    pub fn unsupported() -> Self {
        Self::default()
    }

    pub fn matched(source: impl Into<String>) -> Self {
        Self {
            supported: true,
            source: Some(source.into()),
        }
    }
}

/// What to pass as yt-dlp's `-f`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatSelection {
    /// Let the collaborator choose
    #[default]
    Default,
    /// One concrete format id
    Explicit(String),
    /// Separate video and audio streams muxed together
    Paired { video: String, audio: String },
}

impl FormatSelection {
    /// Format spec string, `None` for the collaborator default
    pub fn spec(&self) -> Option<String> {
        match self {
            Self::Default => None,
            Self::Explicit(id) => Some(id.clone()),
            Self::Paired { video, audio } => Some(format!("{}+{}", video, audio)),
        }
    }
}

/// Options handed to the collaborator's download call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    pub format: FormatSelection,
    /// yt-dlp output template; `None` keeps the collaborator default
    pub output_template: Option<String>,
    pub write_auto_subs: bool,
}

/// Download progress information
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub percent: f32,
    pub status: String,
}
