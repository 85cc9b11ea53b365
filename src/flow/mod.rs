//! Interactive resolution flow.
//!
//! Drives the user from a line of free text to one dispatched download:
//!
//! 1. read a query; a URL some named source handler supports (other than the
//!    search provider) is downloaded right away with default options
//! 2. otherwise normalize it, pick a result count and search, re-prompting
//!    while the search comes back empty
//! 3. pick a result, a media type, an output directory and a format (explicit
//!    or the best-quality pairing), then the subtitle flag
//! 4. hand the finished [`DownloadRequest`] to the collaborator
//!
//! Every step is a method on [`ResolutionFlow`] that reads the terminal and
//! updates [`FlowState`], so steps can be exercised one at a time.

pub mod error;
pub mod query;
pub mod terminal;

use tracing::{debug, info, warn};

use crate::downloader::format_selector::FormatSelector;
use crate::downloader::models::{CandidateItem, DownloadOptions};
use crate::downloader::request::DownloadRequest;
use crate::downloader::traits::MediaCollaborator;
use crate::table::GridTable;

pub use error::FlowError;
pub use query::{normalize_query, parse_count, parse_index, parse_yes_no, ILLEGAL_CHARS};
pub use terminal::{ScriptedTerminal, StdioTerminal, Terminal};

pub const BANNER: &str = "YOUTUBE-DL BASED DOWNLOADER";

pub const QUERY_PROMPT: &str = "Enter the url or search term: ";
pub const FIRST_RESULT_QUESTION: &str = "Do you want the first result?";
pub const YES_NO_PROMPT: &str = "y/n: ";
pub const COUNT_PROMPT: &str = "Enter the number of results to search: ";
pub const RESULT_PROMPT: &str = "Enter the number of the result you want to download: ";
pub const MEDIA_TYPE_PROMPT: &str = "Enter the media type (audio/video): ";
pub const OUTPUT_DIR_PROMPT: &str = "Enter the output directory: ";
pub const BEST_QUALITY_PROMPT: &str = "Download best quality? (y/n): ";
pub const FORMAT_PROMPT: &str = "Enter the number of the format you want to download: ";
pub const SUBTITLES_PROMPT: &str = "Download auto-generated subtitles? (y/n): ";

pub const RETRY_FIRST_RESULT: &str = "No results found. Try again.";
pub const RETRY_WITH_COUNT: &str = "No results found, try again with a different query";
pub const DOWNLOAD_COMPLETE: &str = "Download complete";

/// Tunables for one run
#[derive(Debug, Clone)]
pub struct FlowOptions {
    /// Stop with an error after this many empty searches; `None` retries forever
    pub max_search_attempts: Option<usize>,
    /// How many source handler names the banner table lists (0 hides it)
    pub source_preview: usize,
    /// Used when the output directory answer is blank
    pub default_output_dir: String,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            max_search_attempts: None,
            source_preview: 5,
            default_output_dir: default_output_dir(),
        }
    }
}

/// The user's download directory, or the working directory when there is none
pub fn default_output_dir() -> String {
    dirs::download_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .to_string_lossy()
        .to_string()
}

/// Everything the flow has learned so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowState {
    /// Last line typed at the query prompt
    pub raw_query: String,
    /// `raw_query` after normalization
    pub query: String,
    /// First-result shortcut chosen
    pub first_only: bool,
    /// Results requested per search
    pub count: usize,
    pub candidates: Vec<CandidateItem>,
    /// Empty searches so far
    pub retries: usize,
    /// 0-based index into `candidates`
    pub selected: Option<usize>,
}

/// How the format gets chosen in step 9
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityChoice {
    /// 1-based format number from the table
    Explicit(usize),
    BestQuality,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Fast path: the raw input was downloaded with default options
    Direct { url: String, source: String },
    /// Full negotiation
    Downloaded(DownloadRequest),
}

pub struct ResolutionFlow<'a, C: ?Sized, T> {
    collaborator: &'a C,
    terminal: T,
    options: FlowOptions,
    state: FlowState,
}

impl<'a, C, T> ResolutionFlow<'a, C, T>
where
    C: MediaCollaborator + ?Sized,
    T: Terminal,
{
    pub fn new(collaborator: &'a C, terminal: T, options: FlowOptions) -> Self {
        Self {
            collaborator,
            terminal,
            options,
            state: FlowState::default(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn into_terminal(self) -> T {
        self.terminal
    }

    /// Run every step in order
    pub async fn run(&mut self) -> Result<FlowOutcome, FlowError> {
        self.show_banner().await;

        let raw = self.acquire_input()?;
        if let Some(outcome) = self.try_direct_download(&raw).await? {
            return Ok(outcome);
        }

        self.normalize(raw);
        self.choose_result_count()?;
        self.search_until_found().await?;
        self.present_results();
        self.select_candidate()?;

        let media_type = self.ask_media_type()?;
        let output_dir = self.ask_output_dir()?;
        let quality = self.choose_quality()?;
        let write_auto_subs = self.ask_subtitles()?;

        let request = self.build_request(quality, &output_dir, &media_type, write_auto_subs)?;
        self.dispatch(request).await
    }

    /// Title line plus a short table of supported sources
    pub async fn show_banner(&mut self) {
        self.terminal.say(BANNER);

        if self.options.source_preview == 0 {
            return;
        }

        // informational only, so a failure here does not stop the run
        match self.collaborator.list_source_handlers().await {
            Ok(sources) if !sources.is_empty() => {
                let rows = sources
                    .iter()
                    .take(self.options.source_preview)
                    .enumerate()
                    .map(|(i, name)| vec![(i + 1).to_string(), name.clone()])
                    .collect();
                let table = GridTable::new(["#", "Supported source"]).with_rows(rows);
                self.terminal.show_table(&table);
                self.terminal
                    .say(&format!("...and {} sources in total", sources.len()));
            }
            Ok(_) => debug!("No source handlers reported"),
            Err(e) => warn!(error = %e, "Could not list source handlers"),
        }
    }

    /// Step 1
    pub fn acquire_input(&mut self) -> Result<String, FlowError> {
        let raw = self.terminal.ask(QUERY_PROMPT)?;
        self.state.raw_query = raw.clone();
        Ok(raw)
    }

    /// Step 2: download `raw` as-is when a named, non-search handler claims it.
    /// No format, template or subtitle options are applied on this path.
    pub async fn try_direct_download(&mut self, raw: &str) -> Result<Option<FlowOutcome>, FlowError> {
        let probe = self.collaborator.probe(raw.trim()).await?;
        debug!(collaborator = self.collaborator.name(), ?probe, "Probed input");

        let source = match probe.source {
            Some(source) if probe.supported && source != self.collaborator.search_provider() => {
                source
            }
            _ => return Ok(None),
        };

        let url = raw.trim().to_string();
        info!(
            collaborator = self.collaborator.name(),
            %url,
            %source,
            "Direct URL, skipping search"
        );
        self.terminal
            .say(&format!("Supported {} URL, downloading directly", source));

        self.collaborator
            .download(&url, &DownloadOptions::default())
            .await?;
        self.terminal.say(DOWNLOAD_COMPLETE);

        Ok(Some(FlowOutcome::Direct { url, source }))
    }

    /// Step 3
    pub fn normalize(&mut self, raw: String) {
        self.state.query = normalize_query(&raw);
        self.state.raw_query = raw;
        self.terminal.say(&format!("query: {}", self.state.query));
    }

    /// Step 4
    pub fn choose_result_count(&mut self) -> Result<(), FlowError> {
        self.terminal.say(FIRST_RESULT_QUESTION);
        self.state.first_only = parse_yes_no(&self.terminal.ask(YES_NO_PROMPT)?);

        self.state.count = if self.state.first_only {
            1
        } else {
            self.ask_count()?
        };
        Ok(())
    }

    fn ask_count(&mut self) -> Result<usize, FlowError> {
        parse_count("result count", &self.terminal.ask(COUNT_PROMPT)?)
    }

    /// Step 5: search, re-prompting until something comes back
    pub async fn search_until_found(&mut self) -> Result<(), FlowError> {
        loop {
            let items = self
                .collaborator
                .search(&self.state.query, self.state.count)
                .await?;

            if !items.is_empty() {
                info!(
                    query = %self.state.query,
                    found = items.len(),
                    retries = self.state.retries,
                    "Search returned results"
                );
                self.state.candidates = items;
                return Ok(());
            }

            self.state.retries += 1;
            debug!(query = %self.state.query, retries = self.state.retries, "Empty search result");

            if let Some(max) = self.options.max_search_attempts {
                if self.state.retries >= max {
                    return Err(FlowError::SearchAttemptsExhausted {
                        attempts: self.state.retries,
                    });
                }
            }

            // retries never re-run the direct URL check
            if self.state.first_only {
                self.terminal.say(RETRY_FIRST_RESULT);
                let raw = self.terminal.ask(QUERY_PROMPT)?;
                self.normalize(raw);
            } else {
                self.terminal.say(RETRY_WITH_COUNT);
                let raw = self.terminal.ask(QUERY_PROMPT)?;
                self.normalize(raw);
                self.state.count = self.ask_count()?;
            }
        }
    }

    /// Step 6
    pub fn present_results(&mut self) {
        for (i, item) in self.state.candidates.iter().enumerate() {
            self.terminal.say(&format!("{}: {}", i + 1, item.title));
        }
    }

    /// Step 7: a single result is taken without asking
    pub fn select_candidate(&mut self) -> Result<&CandidateItem, FlowError> {
        let len = self.state.candidates.len();
        let index = if len == 1 {
            0
        } else {
            parse_index("result number", &self.terminal.ask(RESULT_PROMPT)?, len)? - 1
        };

        self.state.selected = Some(index);
        Ok(&self.state.candidates[index])
    }

    fn selected(&self) -> Result<&CandidateItem, FlowError> {
        let len = self.state.candidates.len();
        self.state
            .selected
            .and_then(|i| self.state.candidates.get(i))
            .ok_or(FlowError::IndexOutOfRange {
                field: "result number",
                index: 0,
                len,
            })
    }

    /// Step 8a, free text
    pub fn ask_media_type(&mut self) -> Result<String, FlowError> {
        Ok(self.terminal.ask(MEDIA_TYPE_PROMPT)?.trim().to_string())
    }

    /// Step 8b; the directory is not checked for existence
    pub fn ask_output_dir(&mut self) -> Result<String, FlowError> {
        let answer = self.terminal.ask(OUTPUT_DIR_PROMPT)?;
        let dir = answer.trim();
        if dir.is_empty() {
            debug!(dir = %self.options.default_output_dir, "Using default output directory");
            Ok(self.options.default_output_dir.clone())
        } else {
            Ok(dir.to_string())
        }
    }

    /// Step 9. The choice is checked against the selected candidate here so a
    /// bad index or a missing stream pair fails before the subtitle prompt.
    pub fn choose_quality(&mut self) -> Result<QualityChoice, FlowError> {
        let best = parse_yes_no(&self.terminal.ask(BEST_QUALITY_PROMPT)?);
        let candidate = self.selected()?.clone();

        if best {
            FormatSelector::best_pair(&candidate.formats)?;
            return Ok(QualityChoice::BestQuality);
        }

        let table = GridTable::new(FormatSelector::table_headers())
            .with_rows(FormatSelector::table_rows(&candidate.formats));
        self.terminal.show_table(&table);

        let number = parse_index(
            "format number",
            &self.terminal.ask(FORMAT_PROMPT)?,
            candidate.formats.len(),
        )?;
        Ok(QualityChoice::Explicit(number))
    }

    /// Step 10
    pub fn ask_subtitles(&mut self) -> Result<bool, FlowError> {
        Ok(parse_yes_no(&self.terminal.ask(SUBTITLES_PROMPT)?))
    }

    pub fn build_request(
        &self,
        quality: QualityChoice,
        output_dir: &str,
        media_type: &str,
        write_auto_subs: bool,
    ) -> Result<DownloadRequest, FlowError> {
        let candidate = self.selected()?;
        let request = match quality {
            QualityChoice::Explicit(number) => {
                DownloadRequest::explicit(candidate, number, output_dir, media_type, write_auto_subs)?
            }
            QualityChoice::BestQuality => {
                DownloadRequest::best_quality(candidate, output_dir, media_type, write_auto_subs)?
            }
        };
        debug!(?request, "Download request built");
        Ok(request)
    }

    /// Step 11
    pub async fn dispatch(&mut self, request: DownloadRequest) -> Result<FlowOutcome, FlowError> {
        info!(
            collaborator = self.collaborator.name(),
            locator = request.locator(),
            media_type = request.media_type(),
            format = ?request.format_spec(),
            "Dispatching download"
        );

        self.collaborator
            .download(request.locator(), request.options())
            .await?;
        self.terminal.say(DOWNLOAD_COMPLETE);

        Ok(FlowOutcome::Downloaded(request))
    }
}
