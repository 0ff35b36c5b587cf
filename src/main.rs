use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use vibecite::commands;

/// Turn natural-language paper descriptions into curated citations
#[derive(Parser)]
#[command(name = "vc", author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize or continue a bibliography project
    Init {
        /// BibTeX file path
        #[arg(long)]
        bib: Option<PathBuf>,
    },
    /// Add a paper vibe (natural language description)
    ///
    /// Usage: vc add -- "description of papers you want"
    Add {
        /// Description of the papers you want, given after --
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },
    /// Search for papers using Claude Code
    Search,
    /// Export collected citations
    Export {
        /// Output BibTeX file
        #[arg(long)]
        bib: Option<PathBuf>,
        /// Output format (bibtex only for now)
        #[arg(long, default_value = "bibtex")]
        format: String,
    },
    /// Show currently recorded status
    Ls,
    /// Clear current session
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let cwd = env::current_dir()?;

    match cli.command {
        Command::Init { bib } => commands::init(&cwd, bib),
        Command::Add { description } => commands::add(&cwd, &description),
        Command::Search => commands::search(&cwd),
        Command::Export { bib, format } => commands::export(&cwd, bib, &format),
        Command::Ls => commands::ls(&cwd),
        Command::Clear => commands::clear(&cwd),
    }
}
