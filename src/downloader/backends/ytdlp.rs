// yt-dlp backend - production collaborator
//
// Search, download and the extractor listing go through the `yt-dlp` binary.
// Probing needs the extractor classes themselves, so it runs a short script
// against the `yt_dlp` Python module.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::downloader::config::ExtractorConfig;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{CandidateItem, DownloadOptions, FormatOption, ProbeResult};
use crate::downloader::progress::{parse_progress_line, ProgressEmitter};
use crate::downloader::traits::MediaCollaborator;
use crate::downloader::utils::{run_output, spawn_piped, stderr_message};

/// Extractor key yt-dlp uses for `ytsearchN:` queries
pub const SEARCH_PROVIDER: &str = "YoutubeSearch";

/// Extractor key of the catch-all handler
pub const GENERIC_HANDLER: &str = "Generic";

/// Prints the key of the first non-generic extractor that accepts argv[1]
const PROBE_SCRIPT: &str = r#"
import sys
from yt_dlp.extractor import gen_extractor_classes
url = sys.argv[1]
for ie in gen_extractor_classes():
    if ie.ie_key() == 'Generic':
        continue
    if ie.suitable(url):
        print(ie.ie_key())
        break
"#;

pub struct YtDlpBackend {
    config: ExtractorConfig,
}

impl YtDlpBackend {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn search_args(&self, query: &str, count: usize) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
        ];
        args.extend(self.config.common_args());
        args.push(format!("ytsearch{}:{}", count, query));
        args
    }

    fn download_args(&self, locator: &str, options: &DownloadOptions) -> Vec<String> {
        let mut args = vec!["--newline".to_string(), "--no-warnings".to_string()];

        if let Some(spec) = options.format.spec() {
            args.push("-f".to_string());
            args.push(spec);
        }

        if let Some(template) = &options.output_template {
            args.push("-o".to_string());
            args.push(template.clone());
        }

        if options.write_auto_subs {
            args.push("--write-auto-subs".to_string());
        }

        args.extend(self.config.common_args());
        args.push(locator.to_string());
        args
    }
}

#[async_trait]
impl MediaCollaborator for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn search_provider(&self) -> &str {
        SEARCH_PROVIDER
    }

    async fn probe(&self, url: &str) -> Result<ProbeResult, DownloadError> {
        let args = vec!["-c".to_string(), PROBE_SCRIPT.to_string(), url.to_string()];

        // Without the Python module (binary-only installs) every input is
        // treated as a search query.
        let output = match run_output(&self.config.python_cmd, &args).await {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Python not available, skipping URL probe");
                return Ok(ProbeResult::unsupported());
            }
        };

        if !output.status.success() {
            let error = DownloadError::from(stderr_message(&output));
            if matches!(error, DownloadError::ToolNotFound(_)) {
                warn!(%error, "yt_dlp module not installed, skipping URL probe");
                return Ok(ProbeResult::unsupported());
            }
            return Err(error);
        }

        let result = probe_result(&output.stdout);
        debug!(url, ?result, "Probe finished");
        Ok(result)
    }

    async fn search(&self, query: &str, count: usize) -> Result<Vec<CandidateItem>, DownloadError> {
        if query.trim().is_empty() {
            debug!("Blank query, skipping search");
            return Ok(Vec::new());
        }

        let args = self.search_args(query, count);
        let output = run_output(&self.config.ytdlp_path, &args)
            .await
            .map_err(DownloadError::ToolNotFound)?;

        if !output.status.success() {
            return Err(DownloadError::from(stderr_message(&output)));
        }

        let items = parse_search_json(&output.stdout)?;
        info!(query, requested = count, found = items.len(), "Search finished");
        Ok(items)
    }

    async fn download(&self, locator: &str, options: &DownloadOptions) -> Result<(), DownloadError> {
        let args = self.download_args(locator, options);
        info!(
            program = %self.config.ytdlp_path,
            args = %args.join(" "),
            "Starting download"
        );

        let mut child = spawn_piped(&self.config.ytdlp_path, &args).map_err(|e| {
            DownloadError::ToolNotFound(format!("{}: {}", self.config.ytdlp_path, e))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            DownloadError::ExecutionError("Failed to capture yt-dlp stdout".to_string())
        })?;
        let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
            DownloadError::ExecutionError("Failed to capture yt-dlp stderr".to_string())
        })?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr_pipe.read_to_end(&mut buf).await;
            buf
        });

        let emitter = ProgressEmitter::new();
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| DownloadError::ExecutionError(format!("Failed to read stdout: {}", e)))?
        {
            match parse_progress_line(&line) {
                Some(progress) => emitter.emit(&progress),
                None => debug!(line = %line, "yt-dlp output"),
            }
        }
        emitter.finish();

        let status = child
            .wait()
            .await
            .map_err(|e| DownloadError::ExecutionError(format!("Failed to wait for yt-dlp: {}", e)))?;
        let stderr = stderr_task.await.unwrap_or_default();

        if status.success() {
            info!(locator, "Download finished");
            Ok(())
        } else {
            let message = String::from_utf8_lossy(&stderr).trim().to_string();
            warn!(locator, %status, "Download failed");
            Err(DownloadError::from(if message.is_empty() {
                format!("yt-dlp exited with {}", status)
            } else {
                message
            }))
        }
    }

    async fn list_source_handlers(&self) -> Result<Vec<String>, DownloadError> {
        let args = vec!["--list-extractors".to_string()];
        let output = run_output(&self.config.ytdlp_path, &args)
            .await
            .map_err(DownloadError::ToolNotFound)?;

        if !output.status.success() {
            return Err(DownloadError::from(stderr_message(&output)));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Key printed by the probe script; nothing or the generic handler means no match
fn probe_result(stdout: &[u8]) -> ProbeResult {
    let key = String::from_utf8_lossy(stdout).trim().to_string();
    if key.is_empty() || key == GENERIC_HANDLER {
        ProbeResult::unsupported()
    } else {
        ProbeResult::matched(key)
    }
}

/// `--dump-single-json` output of a `ytsearchN:` query
#[derive(Debug, Deserialize)]
struct SearchPlaylist {
    entries: Option<Vec<Option<SearchEntry>>>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    title: Option<String>,
    webpage_url: Option<String>,
    original_url: Option<String>,
    url: Option<String>,
    formats: Option<Vec<FormatOption>>,
}

impl SearchEntry {
    /// `None` when yt-dlp reported no URL to download from
    fn into_candidate(self) -> Option<CandidateItem> {
        let title = self.title.unwrap_or_else(|| "Unknown".to_string());
        let Some(webpage_url) = [self.webpage_url, self.original_url, self.url]
            .into_iter()
            .flatten()
            .find(|u| !u.trim().is_empty())
        else {
            debug!(%title, "Skipping search entry without a URL");
            return None;
        };

        Some(CandidateItem {
            title,
            webpage_url,
            formats: self.formats.unwrap_or_default(),
        })
    }
}

fn parse_search_json(stdout: &[u8]) -> Result<Vec<CandidateItem>, DownloadError> {
    let playlist: SearchPlaylist = serde_json::from_slice(stdout)
        .map_err(|e| DownloadError::ParseError(format!("Invalid JSON: {}", e)))?;

    // Unavailable results come back as null entries
    Ok(playlist
        .entries
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(SearchEntry::into_candidate)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::FormatSelection;

    const SEARCH_JSON: &str = r#"{
        "_type": "playlist",
        "id": "my song",
        "entries": [
            {
                "title": "MySong",
                "webpage_url": "https://www.youtube.com/watch?v=abc",
                "formats": [
                    {"format_id": "140", "ext": "m4a", "resolution": "audio only",
                     "format_note": "medium", "vcodec": "none", "acodec": "mp4a.40.2"},
                    {"format_id": "137", "ext": "mp4", "resolution": "1920x1080",
                     "format_note": "1080p", "vcodec": "avc1.640028", "acodec": "none"}
                ]
            },
            null,
            {"title": "No formats", "url": "https://www.youtube.com/watch?v=def"},
            {"title": "No URL", "formats": []}
        ]
    }"#;

    fn backend() -> YtDlpBackend {
        YtDlpBackend::new(
            ExtractorConfig::default()
                .with_ytdlp_path("/usr/bin/yt-dlp")
                .with_proxy(Some("socks5://127.0.0.1:1080".to_string())),
        )
    }

    #[test]
    fn test_parse_search_json() {
        let items = parse_search_json(SEARCH_JSON.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "MySong");
        assert_eq!(items[0].formats.len(), 2);
        assert!(items[0].formats[0].is_audio_only());
        assert!(items[0].formats[1].is_video_only());
        assert_eq!(items[1].webpage_url, "https://www.youtube.com/watch?v=def");
        assert!(items[1].formats.is_empty());
    }

    #[test]
    fn test_entry_without_url_is_skipped() {
        let items = parse_search_json(SEARCH_JSON.as_bytes()).unwrap();
        assert!(items.iter().all(|item| !item.webpage_url.is_empty()));
        assert!(items.iter().all(|item| item.title != "No URL"));
    }

    #[test]
    fn test_null_fields_are_tolerated() {
        let json = br#"{"entries": [{"title": null, "webpage_url": "https://a", "formats": null}]}"#;
        let items = parse_search_json(json).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Unknown");
        assert!(items[0].formats.is_empty());
    }

    #[test]
    fn test_generic_handler_is_not_a_match() {
        assert_eq!(probe_result(b"Generic\n"), ProbeResult::unsupported());
    }

    #[test]
    fn test_empty_probe_output_is_not_a_match() {
        assert_eq!(probe_result(b""), ProbeResult::unsupported());
        assert_eq!(probe_result(b"  \n"), ProbeResult::unsupported());
    }

    #[test]
    fn test_named_handler_is_a_match() {
        assert_eq!(probe_result(b"Vimeo\n"), ProbeResult::matched("Vimeo"));
    }

    #[test]
    fn test_parse_search_without_entries() {
        let items = parse_search_json(br#"{"_type": "playlist"}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_search_rejects_garbage() {
        let err = parse_search_json(b"not json").unwrap_err();
        assert!(matches!(err, DownloadError::ParseError(_)));
    }

    #[test]
    fn test_search_args() {
        let args = backend().search_args("my song", 3);

        assert_eq!(args.first().map(String::as_str), Some("--dump-single-json"));
        assert_eq!(args.last().map(String::as_str), Some("ytsearch3:my song"));
        assert!(args.contains(&"--proxy".to_string()));
    }

    #[test]
    fn test_default_download_args() {
        let args = backend().download_args("https://vimeo.com/1", &DownloadOptions::default());

        assert!(!args.contains(&"-f".to_string()));
        assert!(!args.contains(&"-o".to_string()));
        assert!(!args.contains(&"--write-auto-subs".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("https://vimeo.com/1"));
    }

    #[test]
    fn test_full_download_args() {
        let options = DownloadOptions {
            format: FormatSelection::Paired {
                video: "137".to_string(),
                audio: "140".to_string(),
            },
            output_template: Some("/tmp/out/MySong.%(ext)s".to_string()),
            write_auto_subs: true,
        };
        let args = backend().download_args("https://www.youtube.com/watch?v=abc", &options);

        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "137+140");
        let o = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[o + 1], "/tmp/out/MySong.%(ext)s");
        assert!(args.contains(&"--write-auto-subs".to_string()));
    }

    #[tokio::test]
    async fn test_blank_query_does_not_spawn() {
        let backend = YtDlpBackend::new(
            ExtractorConfig::default().with_ytdlp_path("/nonexistent/yt-dlp"),
        );
        let items = backend.search("   ", 5).await.unwrap();
        assert!(items.is_empty());
    }
}
