// Helper functions for backend implementations

use std::io;
use std::path::Path;
use std::process::{Output, Stdio};

use tokio::process::{Child, Command as TokioCommand};
use tracing::debug;

/// Run a command to completion, capturing stdout and stderr
pub async fn run_output(program: &str, args: &[String]) -> Result<Output, String> {
    debug!(program, args = %args.join(" "), "Running command");

    TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("Failed to start {}: {}", program, e))
}

/// Spawn with piped stdout/stderr; the child is killed if its handle is
/// dropped before it exits
pub fn spawn_piped(program: &str, args: &[String]) -> io::Result<Child> {
    debug!(program, args = %args.join(" "), "Spawning command");

    TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Find yt-dlp executable in common paths
pub fn find_ytdlp() -> String {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
        "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac / pipx
        "/usr/bin/yt-dlp",          // System installation
    ];

    for path in common_paths {
        if Path::new(path).exists() {
            return path.to_string();
        }
    }

    if let Ok(output) = std::process::Command::new("which").arg("yt-dlp").output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    // Last resort: hope it's in PATH
    "yt-dlp".to_string()
}

/// Non-empty trimmed stderr, or a placeholder mentioning the exit status
pub fn stderr_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("exited with {}", output.status)
    } else {
        trimmed.to_string()
    }
}
