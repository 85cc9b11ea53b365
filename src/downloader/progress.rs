// yt-dlp progress line parsing and terminal rendering

use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use regex::Regex;

use super::models::DownloadProgress;

lazy_static! {
    static ref PROGRESS_RE: Regex = Regex::new(
        r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*(\d+\.?\d*\s*\w+)(?:\s+at\s+(\S+(?:\s*\w+/s)?))?(?:\s+ETA\s+(\S+))?(?:\s+\(frag\s+(\d+)/(\d+)\))?"
    )
    .unwrap();
    static ref DEST_RE: Regex = Regex::new(r"\[download\]\s+Destination:\s+(.+)").unwrap();
    static ref MERGE_RE: Regex = Regex::new(r"\[Merger?\]\s+Merging").unwrap();
    static ref ALREADY_RE: Regex = Regex::new(r"has already been downloaded").unwrap();
}

/// Parse one yt-dlp `--newline` output line like:
/// [download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)
pub fn parse_progress_line(line: &str) -> Option<DownloadProgress> {
    if let Some(caps) = PROGRESS_RE.captures(line) {
        let percent: f32 = caps.get(1)?.as_str().parse().ok()?;
        let size = caps.get(2).map(|m| m.as_str()).unwrap_or("?");
        let speed = caps.get(3).map(|m| m.as_str()).unwrap_or("?");
        let eta = caps.get(4).map(|m| m.as_str());
        let frags = caps.get(5).zip(caps.get(6));

        let mut status = format!("{:.1}% of {} @ {}", percent, size, speed);
        if let Some(eta) = eta {
            status.push_str(&format!(" ETA {}", eta));
        }
        if let Some((current, total)) = frags {
            status.push_str(&format!(" (frag {}/{})", current.as_str(), total.as_str()));
        }

        return Some(DownloadProgress { percent, status });
    }

    if let Some(caps) = DEST_RE.captures(line) {
        let filename = caps.get(1).map(|m| m.as_str()).unwrap_or("file");
        let short_name: String = filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(filename)
            .chars()
            .take(50)
            .collect();
        return Some(DownloadProgress {
            percent: 0.0,
            status: format!("Starting: {}", short_name),
        });
    }

    if MERGE_RE.is_match(line) {
        return Some(DownloadProgress {
            percent: 99.0,
            status: "Merging video and audio...".to_string(),
        });
    }

    if ALREADY_RE.is_match(line) {
        return Some(DownloadProgress {
            percent: 100.0,
            status: "File already downloaded".to_string(),
        });
    }

    None
}

/// Draws progress as one bar on stderr; indicatif hides it when stderr is
/// not a terminal
pub struct ProgressEmitter {
    bar: ProgressBar,
}

impl ProgressEmitter {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(100))
    }

    /// Percent-scaled bar (length 100)
    pub fn with_bar(bar: ProgressBar) -> Self {
        bar.set_length(100);
        bar.set_style(
            ProgressStyle::with_template("[{bar:30}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    pub fn emit(&self, progress: &DownloadProgress) {
        self.bar.set_position(progress.percent.clamp(0.0, 100.0) as u64);
        self.bar.set_message(progress.status.clone());
    }

    /// Remove the bar once the download ends
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
