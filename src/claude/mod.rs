//! Integration with the Claude Code CLI, which performs the actual paper
//! search. The local side only builds prompts, pipes them to the subprocess
//! and scans the reply for BibTeX blocks.

pub mod extract;
pub mod permissions;

pub use extract::{extract_bibtex_entries, parse_response, ParsedResponse};
pub use permissions::ensure_search_tools;

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};

/// Executable expected on PATH.
const CLAUDE_BIN: &str = "claude";

/// Build the per-vibe search prompt.
pub fn search_prompt(description: &str) -> String {
    format!(
        r#"Please search for academic papers matching this description: "{description}"

Please find ONLY ONE most relevant paper and return it in BibTeX format. IMPORTANT: When choosing between multiple versions of the same paper, prioritize the conference/journal publication over the arXiv version. Include DOI when available. Format your response with the BibTeX entry inside ```bibtex ``` code blocks."#
    )
}

/// Wrap a search prompt with instructions to use the web tools.
fn enhanced_prompt(prompt: &str) -> String {
    format!(
        "You have access to search tools including WebSearch and WebFetch. Use these tools to search for academic papers.\n\n{prompt}\n\nPlease use your available search tools to find relevant academic papers and format them as BibTeX entries. Be thorough in your search and provide high-quality citations."
    )
}

/// Call the Claude CLI with a search prompt and return its stdout.
///
/// The call blocks until the subprocess exits; a spinner ticks meanwhile.
/// Every failure mode (missing binary, nonzero exit, other spawn errors) is
/// reported to the user and yields an empty string, which callers treat as
/// "no results". No retries, no timeout.
pub fn call_claude(prompt: &str) -> String {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message("Calling Claude Code...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let full_prompt = enhanced_prompt(prompt);
    debug!("Invoking {} with a {} byte prompt", CLAUDE_BIN, full_prompt.len());

    match run_claude(&full_prompt) {
        Ok(output) if output.status.success() => {
            spinner.finish_with_message("Claude Code completed successfully");
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        Ok(output) => {
            spinner.finish_with_message(format!("Error: {}", output.status));
            warn!("{} exited with {}", CLAUDE_BIN, output.status);
            let stderr = String::from_utf8_lossy(&output.stderr);
            eprintln!(
                "{}",
                style(format!("Error calling Claude Code: {}", output.status)).red()
            );
            if !stderr.trim().is_empty() {
                eprintln!("{}", style(format!("Error output: {}", stderr.trim())).red());
            }
            String::new()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            spinner.finish_with_message("Claude Code CLI not found");
            eprintln!(
                "{}",
                style("Claude Code CLI not found. Please install it first.").red()
            );
            String::new()
        }
        Err(e) => {
            spinner.finish_with_message("Failed to run Claude Code");
            eprintln!("{}", style(format!("Error calling Claude Code: {e}")).red());
            String::new()
        }
    }
}

/// Spawn `claude --` with the prompt on stdin and collect its output.
fn run_claude(prompt: &str) -> std::io::Result<std::process::Output> {
    let mut child = Command::new(CLAUDE_BIN)
        .arg("--")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(prompt.as_bytes())?;
        // Dropping stdin closes the pipe so the CLI sees end of input.
    }

    child.wait_with_output()
}
