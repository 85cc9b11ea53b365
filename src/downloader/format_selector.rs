// FormatSelector - format table rows and the best-quality pairing policy
//
// Formats arrive ordered worst -> best (yt-dlp convention), so "best" always
// means "last matching entry".

use thiserror::Error;

use super::models::{FormatOption, FormatSelection};

/// Reasons a format cannot be selected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("format number {index} is out of range (1-{len})")]
    FormatOutOfRange { index: usize, len: usize },

    #[error("no video-only stream available")]
    NoVideoStream,

    #[error("no audio pairing rule for {video_ext} video")]
    NoPairingRule { video_ext: String },

    #[error("no {audio_ext} audio-only stream to pair with {video_ext} video")]
    NoCompatibleAudio {
        video_ext: String,
        audio_ext: String,
    },
}

/// Container pairings: video extension -> audio extension it muxes with
const AUDIO_PAIRINGS: &[(&str, &str)] = &[("mp4", "m4a"), ("webm", "webm")];

/// Audio extension that pairs with a video extension
pub fn paired_audio_ext(video_ext: &str) -> Option<&'static str> {
    AUDIO_PAIRINGS
        .iter()
        .find(|(video, _)| video.eq_ignore_ascii_case(video_ext))
        .map(|(_, audio)| *audio)
}

/// Chosen stream pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamPair<'a> {
    pub video: &'a FormatOption,
    pub audio: &'a FormatOption,
}

impl StreamPair<'_> {
    pub fn selection(&self) -> FormatSelection {
        FormatSelection::Paired {
            video: self.video.format_id.clone(),
            audio: self.audio.format_id.clone(),
        }
    }
}

/// Format selector with table and pairing helpers
pub struct FormatSelector;

impl FormatSelector {
    /// Best video-only stream plus the best audio-only stream in the paired
    /// container. No fallback pairing is attempted.
    pub fn best_pair(formats: &[FormatOption]) -> Result<StreamPair<'_>, SelectionError> {
        let video = formats
            .iter()
            .rev()
            .find(|f| f.is_video_only())
            .ok_or(SelectionError::NoVideoStream)?;

        let audio_ext =
            paired_audio_ext(&video.ext).ok_or_else(|| SelectionError::NoPairingRule {
                video_ext: video.ext.clone(),
            })?;

        let audio = formats
            .iter()
            .rev()
            .find(|f| f.is_audio_only() && f.ext.eq_ignore_ascii_case(audio_ext))
            .ok_or_else(|| SelectionError::NoCompatibleAudio {
                video_ext: video.ext.clone(),
                audio_ext: audio_ext.to_string(),
            })?;

        Ok(StreamPair { video, audio })
    }

    /// Resolve a 1-based format number typed by the user
    pub fn pick(formats: &[FormatOption], number: usize) -> Result<&FormatOption, SelectionError> {
        number
            .checked_sub(1)
            .and_then(|i| formats.get(i))
            .ok_or(SelectionError::FormatOutOfRange {
                index: number,
                len: formats.len(),
            })
    }

    pub fn table_headers() -> Vec<String> {
        ["Index", "Format", "Extension", "Resolution", "note"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    /// One row per format, 1-based index first
    pub fn table_rows(formats: &[FormatOption]) -> Vec<Vec<String>> {
        formats
            .iter()
            .enumerate()
            .map(|(i, f)| {
                vec![
                    (i + 1).to_string(),
                    f.format_id.clone(),
                    f.ext.clone(),
                    f.resolution_label().to_string(),
                    f.note_label().to_string(),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, ext: &str) -> FormatOption {
        FormatOption {
            format_id: id.to_string(),
            ext: ext.to_string(),
            resolution: Some("1920x1080".to_string()),
            format_note: Some("1080p".to_string()),
            vcodec: Some("avc1.640028".to_string()),
            acodec: Some("none".to_string()),
        }
    }

    fn audio(id: &str, ext: &str) -> FormatOption {
        FormatOption {
            format_id: id.to_string(),
            ext: ext.to_string(),
            resolution: Some("audio only".to_string()),
            format_note: Some("medium".to_string()),
            vcodec: Some("none".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
        }
    }

    fn muxed(id: &str, ext: &str) -> FormatOption {
        FormatOption {
            vcodec: Some("vp9".to_string()),
            acodec: Some("opus".to_string()),
            ..video(id, ext)
        }
    }

    #[test]
    fn test_best_pair_takes_last_matching_streams() {
        let formats = vec![
            video("v1", "mp4"),
            audio("a1", "m4a"),
            video("v2", "mp4"),
            audio("a2", "m4a"),
        ];

        let pair = FormatSelector::best_pair(&formats).unwrap();
        assert_eq!(pair.video.format_id, "v2");
        assert_eq!(pair.audio.format_id, "a2");
        assert_eq!(pair.selection().spec().as_deref(), Some("v2+a2"));
    }

    #[test]
    fn test_best_pair_follows_container() {
        // best video is webm, so the m4a track must be skipped
        let formats = vec![
            audio("140", "m4a"),
            audio("251", "webm"),
            video("137", "mp4"),
            video("248", "webm"),
        ];

        let pair = FormatSelector::best_pair(&formats).unwrap();
        assert_eq!(pair.video.format_id, "248");
        assert_eq!(pair.audio.format_id, "251");
    }

    #[test]
    fn test_muxed_formats_are_not_streams() {
        let formats = vec![video("v1", "mp4"), audio("a1", "m4a"), muxed("18", "mp4")];

        let pair = FormatSelector::best_pair(&formats).unwrap();
        assert_eq!(pair.video.format_id, "v1");
    }

    #[test]
    fn test_no_compatible_audio_is_an_error() {
        let formats = vec![audio("251", "webm"), video("137", "mp4")];

        assert_eq!(
            FormatSelector::best_pair(&formats),
            Err(SelectionError::NoCompatibleAudio {
                video_ext: "mp4".to_string(),
                audio_ext: "m4a".to_string(),
            })
        );
    }

    #[test]
    fn test_no_video_stream_is_an_error() {
        let formats = vec![audio("140", "m4a"), muxed("18", "mp4")];
        assert_eq!(
            FormatSelector::best_pair(&formats),
            Err(SelectionError::NoVideoStream)
        );
    }

    #[test]
    fn test_unknown_container_has_no_pairing() {
        let formats = vec![video("17", "3gp"), audio("140", "m4a")];
        assert!(matches!(
            FormatSelector::best_pair(&formats),
            Err(SelectionError::NoPairingRule { .. })
        ));
    }

    #[test]
    fn test_pick_is_one_based() {
        let formats = vec![video("v1", "mp4"), audio("a1", "m4a")];

        assert_eq!(FormatSelector::pick(&formats, 2).unwrap().format_id, "a1");
        assert!(FormatSelector::pick(&formats, 0).is_err());
        assert_eq!(
            FormatSelector::pick(&formats, 3),
            Err(SelectionError::FormatOutOfRange { index: 3, len: 2 })
        );
    }

    #[test]
    fn test_table_rows() {
        let formats = vec![audio("140", "m4a")];
        let rows = FormatSelector::table_rows(&formats);

        assert_eq!(rows, vec![vec!["1", "140", "m4a", "audio only", "medium"]]);
        assert_eq!(FormatSelector::table_headers().len(), rows[0].len());
    }
}
