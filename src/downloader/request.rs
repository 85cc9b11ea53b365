//! Fully specified download requests.
//!
//! A [`DownloadRequest`] can only be built from a [`CandidateItem`] together
//! with a format of that same candidate, either picked by number or chosen by
//! the best-quality pairing policy.

use tracing::debug;

use super::format_selector::{FormatSelector, SelectionError};
use super::models::{CandidateItem, DownloadOptions, FormatSelection};

/// Extension placeholder resolved by yt-dlp after muxing
pub const EXT_FIELD: &str = "%(ext)s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    locator: String,
    media_type: String,
    options: DownloadOptions,
}

impl DownloadRequest {
    /// Request for the `number`-th (1-based) format of `candidate`.
    pub fn explicit(
        candidate: &CandidateItem,
        number: usize,
        output_dir: &str,
        media_type: &str,
        write_auto_subs: bool,
    ) -> Result<Self, SelectionError> {
        let format = FormatSelector::pick(&candidate.formats, number)?;
        debug!(format_id = %format.format_id, ext = %format.ext, "Explicit format selected");

        Ok(Self {
            locator: candidate.webpage_url.clone(),
            media_type: media_type.to_string(),
            options: DownloadOptions {
                format: FormatSelection::Explicit(format.format_id.clone()),
                output_template: Some(output_template(output_dir, &candidate.title, &format.ext)),
                write_auto_subs,
            },
        })
    }

    /// Request for the best video-only + audio-only pair of `candidate`.
    pub fn best_quality(
        candidate: &CandidateItem,
        output_dir: &str,
        media_type: &str,
        write_auto_subs: bool,
    ) -> Result<Self, SelectionError> {
        let pair = FormatSelector::best_pair(&candidate.formats)?;
        debug!(
            video = %pair.video.format_id,
            audio = %pair.audio.format_id,
            "Best-quality pair selected"
        );

        Ok(Self {
            locator: candidate.webpage_url.clone(),
            media_type: media_type.to_string(),
            options: DownloadOptions {
                format: pair.selection(),
                output_template: Some(output_template(output_dir, &candidate.title, EXT_FIELD)),
                write_auto_subs,
            },
        })
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Format spec passed to `-f`
    pub fn format_spec(&self) -> Option<String> {
        self.options.format.spec()
    }

    pub fn output_template(&self) -> Option<&str> {
        self.options.output_template.as_deref()
    }

    pub fn write_auto_subs(&self) -> bool {
        self.options.write_auto_subs
    }
}

/// `<dir>/<title>.<ext>`; `%` in dir and title is doubled so yt-dlp keeps it literal
fn output_template(output_dir: &str, title: &str, ext: &str) -> String {
    format!(
        "{}/{}.{}",
        escape_template(output_dir),
        escape_template(title),
        ext
    )
}

fn escape_template(text: &str) -> String {
    text.replace('%', "%%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::FormatOption;

    fn candidate(title: &str, formats: Vec<FormatOption>) -> CandidateItem {
        CandidateItem {
            title: title.to_string(),
            webpage_url: "https://www.youtube.com/watch?v=abc".to_string(),
            formats,
        }
    }

    fn format(id: &str, ext: &str, vcodec: &str, acodec: &str) -> FormatOption {
        FormatOption {
            format_id: id.to_string(),
            ext: ext.to_string(),
            resolution: None,
            format_note: None,
            vcodec: Some(vcodec.to_string()),
            acodec: Some(acodec.to_string()),
        }
    }

    #[test]
    fn test_explicit_request() {
        let item = candidate(
            "MySong",
            vec![
                format("18", "mp4", "avc1", "mp4a"),
                FormatOption {
                    resolution: Some("1280x720".to_string()),
                    format_note: Some("720p".to_string()),
                    ..format("22", "mp4", "avc1", "mp4a")
                },
            ],
        );

        let request = DownloadRequest::explicit(&item, 2, "/tmp/out", "video", false).unwrap();

        assert_eq!(request.format_spec().as_deref(), Some("22"));
        assert_eq!(request.output_template(), Some("/tmp/out/MySong.mp4"));
        assert_eq!(request.locator(), "https://www.youtube.com/watch?v=abc");
        assert_eq!(request.media_type(), "video");
        assert!(!request.write_auto_subs());
    }

    #[test]
    fn test_explicit_request_rejects_foreign_index() {
        let item = candidate("MySong", vec![format("22", "mp4", "avc1", "mp4a")]);

        let err = DownloadRequest::explicit(&item, 5, "/tmp/out", "video", false).unwrap_err();
        assert_eq!(err, SelectionError::FormatOutOfRange { index: 5, len: 1 });
    }

    #[test]
    fn test_best_quality_request() {
        let item = candidate(
            "MySong",
            vec![
                format("v1", "mp4", "avc1", "none"),
                format("a1", "m4a", "none", "mp4a"),
                format("v2", "mp4", "avc1", "none"),
                format("a2", "m4a", "none", "mp4a"),
            ],
        );

        let request = DownloadRequest::best_quality(&item, "/tmp/out", "audio", true).unwrap();

        assert_eq!(request.format_spec().as_deref(), Some("v2+a2"));
        assert_eq!(request.output_template(), Some("/tmp/out/MySong.%(ext)s"));
        assert!(request.write_auto_subs());
    }

    #[test]
    fn test_best_quality_template_ignores_codec() {
        let item = candidate(
            "Clip",
            vec![
                format("248", "webm", "vp9", "none"),
                format("251", "webm", "none", "opus"),
            ],
        );

        let request = DownloadRequest::best_quality(&item, "out", "video", false).unwrap();
        assert_eq!(request.output_template(), Some("out/Clip.%(ext)s"));
    }

    #[test]
    fn test_percent_in_title_is_escaped() {
        let item = candidate("100% Hits", vec![format("22", "mp4", "avc1", "mp4a")]);

        let request = DownloadRequest::explicit(&item, 1, "/tmp", "video", false).unwrap();
        assert_eq!(request.output_template(), Some("/tmp/100%% Hits.mp4"));
    }
}
