//! Command handlers. Each one loads the session from the working directory,
//! mutates it in memory and saves on success; there is no cross-process
//! locking, so concurrent invocations race and the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use log::info;

use crate::claude;
use crate::claude::extract::{extract_bibtex_entries, parse_response};
use crate::session::Session;

/// Default bibliography file when none was recorded with `init`.
pub const DEFAULT_BIB_FILE: &str = "refs.bib";

const RAW_PREVIEW_CHARS: usize = 500;
const RESULT_PREVIEW_CHARS: usize = 200;

/// Initialize or continue a bibliography project.
pub fn init(dir: &Path, bib: Option<PathBuf>) -> Result<()> {
    let mut session = Session::load(dir)?;

    let bib_path = resolve_path(dir, bib.unwrap_or_else(|| PathBuf::from(DEFAULT_BIB_FILE)));
    if !bib_path.exists() {
        fs::File::create(&bib_path)
            .with_context(|| format!("Failed to create bibliography file {:?}", bib_path))?;
        println!(
            "{}",
            style(format!("Created new bibliography file: {}", bib_path.display())).green()
        );
    }
    session.current_bib = Some(bib_path.clone());
    session.save(dir)?;

    println!(
        "{}",
        style(format!("Project initialized with bibliography: {}", bib_path.display())).blue()
    );
    Ok(())
}

/// Add a paper vibe (natural language description).
pub fn add(dir: &Path, words: &[String]) -> Result<()> {
    if words.is_empty() {
        println!("{}", style("Please provide a description after --").red());
        println!(
            "{}",
            style("Usage: vc add -- \"your paper description here\"").yellow()
        );
        return Ok(());
    }

    let description = words.join(" ");
    let mut session = Session::load(dir)?;
    session.add_vibe(&description);
    session.save(dir)?;

    println!("{}", style(format!("Added vibe: {description}")).green());
    Ok(())
}

/// Search every vibe that does not have results yet, using `search` to map a
/// description to the assistant's raw response. An empty response means the
/// call failed and the vibe stays pending. Returns how many vibes were
/// queried.
pub fn search_pending<F>(session: &mut Session, mut search: F) -> usize
where
    F: FnMut(&str) -> String,
{
    let mut queried = 0;
    for vibe in session.vibes.iter_mut() {
        if vibe.has_results() {
            continue; // Skip already processed vibes
        }
        queried += 1;

        println!(
            "{}",
            style(format!("Searching for: {}", vibe.description)).blue()
        );

        let response = search(&vibe.description);
        if response.is_empty() {
            println!("{}", style("Search failed").red());
            continue;
        }

        vibe.raw_results = Some(response.clone());

        let parsed = parse_response(&response);
        if parsed.fell_back {
            println!(
                "{}",
                style("Search completed but no BibTeX code blocks found. Using raw response.")
                    .yellow()
            );
        } else {
            println!(
                "{}",
                style(format!(
                    "Search completed! Found {} BibTeX entries.",
                    parsed.entries.len()
                ))
                .green()
            );
        }
        vibe.results = Some(parsed.combined(&response));
    }
    queried
}

/// Search for papers using Claude Code.
pub fn search(dir: &Path) -> Result<()> {
    let mut session = Session::load(dir)?;

    if session.vibes.is_empty() {
        println!(
            "{}",
            style("No vibes added yet. Use 'vc add -- \"description\"' first.").yellow()
        );
        return Ok(());
    }

    // Make sure the CLI may use its web tools before any search runs. A
    // failure here is reported but does not stop the search.
    match claude::ensure_search_tools(dir) {
        Ok(()) => println!(
            "{}",
            style("WebSearch and WebFetch tools are enabled!").green()
        ),
        Err(e) => {
            println!("{}", style(format!("Error reading Claude settings: {e}")).red());
            println!(
                "{}",
                style("Failed to configure search tools in Claude settings.").red()
            );
            println!(
                "{}",
                style("Paper discovery may be limited without search tools.").yellow()
            );
        }
    }

    let queried = search_pending(&mut session, |description| {
        claude::call_claude(&claude::search_prompt(description))
    });
    info!("Queried {} vibe(s)", queried);

    session.save(dir)?;
    Ok(())
}

/// Export collected citations to a bibliography file.
pub fn export(dir: &Path, bib: Option<PathBuf>, format: &str) -> Result<()> {
    if !format.eq_ignore_ascii_case("bibtex") {
        println!(
            "{}",
            style(format!("Unsupported export format: {format} (only bibtex is supported)")).red()
        );
        return Ok(());
    }

    let session = Session::load(dir)?;

    let output_file = bib
        .or_else(|| session.current_bib.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BIB_FILE));
    let output_file = resolve_path(dir, output_file);

    let all_results: Vec<&str> = session
        .vibes
        .iter()
        .filter_map(|vibe| vibe.results.as_deref())
        .collect();

    if all_results.is_empty() {
        println!(
            "{}",
            style("No search results to export. Run 'vc search' first.").yellow()
        );
        return Ok(());
    }

    let combined = all_results.join("\n\n");
    fs::write(&output_file, combined)
        .with_context(|| format!("Failed to write bibliography to {:?}", output_file))?;

    println!(
        "{}",
        style(format!("Exported to {}", output_file.display())).green()
    );
    Ok(())
}

/// Show currently recorded status.
pub fn ls(dir: &Path) -> Result<()> {
    let session = Session::load(dir)?;

    if session.vibes.is_empty() {
        println!("{}", style("No vibes recorded").yellow());
        return Ok(());
    }

    for (i, vibe) in session.vibes.iter().enumerate() {
        println!();
        println!("{} {}", style(format!("Vibe {}:", i + 1)).blue(), vibe.description);

        let Some(results) = &vibe.results else {
            println!("{}", style("No results yet").red());
            continue;
        };

        println!("{}", style("Has parsed results").green());

        if let Some(raw) = &vibe.raw_results {
            println!("\n{}", style("Raw Claude Response:").bold());
            println!("{}", style(preview(raw, RAW_PREVIEW_CHARS)).dim());
        }

        // Re-extract from the stored raw text rather than trusting the
        // stored results string.
        println!("\n{}", style("Parsed BibTeX:").bold());
        let entries = extract_bibtex_entries(vibe.raw_results.as_deref().unwrap_or(""));
        if entries.is_empty() {
            println!("{}", style("No BibTeX entries found in response").yellow());
            println!("{}", style(preview(results, RESULT_PREVIEW_CHARS)).dim());
        } else {
            for entry in &entries {
                println!("{entry}");
            }
        }
    }
    Ok(())
}

/// Clear the current session.
pub fn clear(dir: &Path) -> Result<()> {
    Session::clear(dir)?;
    println!("{}", style("Session cleared").green());
    Ok(())
}

/// Resolve a user-supplied path against the working directory.
fn resolve_path(dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        dir.join(path)
    }
}

/// Char-safe preview with a trailing ellipsis when truncated.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
