//! CLI entry point: prompts on stdin, downloads through yt-dlp.

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ytdl_prompt_lib::downloader::diagnostics::failure_hint;
use ytdl_prompt_lib::{ExtractorConfig, FlowOptions, ResolutionFlow, StdioTerminal, YtDlpBackend};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // RUST_LOG wins; otherwise stay quiet so the prompts read cleanly
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ExtractorConfig::from_env();
    debug!(?config, "Extractor configuration");

    let backend = YtDlpBackend::new(config);
    let mut flow = ResolutionFlow::new(&backend, StdioTerminal::new(), FlowOptions::default());

    match flow.run().await {
        Ok(outcome) => {
            info!(?outcome, "Finished");
            Ok(())
        }
        Err(e) => {
            if let Some(hint) = e.collaborator_error().and_then(failure_hint) {
                eprintln!("{}", hint);
            }
            Err(e.into())
        }
    }
}
