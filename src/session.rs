use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::VibeciteError;

/// Session file tracking the current project, kept in the working directory.
pub const STATE_FILE_NAME: &str = ".vc_state.json";

/// A natural-language description of papers the user wants, plus whatever
/// the search produced for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vibe {
    pub description: String,
    /// Combined BibTeX string once searched; `None` means "not yet done".
    #[serde(default)]
    pub results: Option<String>,
    /// Raw assistant response the results were extracted from.
    #[serde(default)]
    pub raw_results: Option<String>,
}

impl Vibe {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            results: None,
            raw_results: None,
        }
    }

    /// A vibe is searched at most once; set results are never re-queried.
    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }
}

/// Persisted session: vibes in insertion order plus the active bibliography
/// path. Insertion order is the only addressing scheme; vibes carry no IDs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Session {
    pub vibes: Vec<Vibe>,
    #[serde(default)]
    pub current_bib: Option<PathBuf>,
}

impl Session {
    /// Path of the session file inside `dir`.
    pub fn file_path(dir: &Path) -> PathBuf {
        dir.join(STATE_FILE_NAME)
    }

    /// Load the session stored in `dir`, or an empty one when no file
    /// exists. Malformed JSON is a hard error, not a silent reset.
    pub fn load(dir: &Path) -> Result<Self, VibeciteError> {
        let path = Self::file_path(dir);
        if !path.exists() {
            debug!("No session file at {:?}, starting empty", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|source| VibeciteError::MalformedSession { path, source })
    }

    /// Overwrite the session file in `dir`. Read-modify-write with no
    /// locking; concurrent invocations race and the last writer wins.
    pub fn save(&self, dir: &Path) -> Result<(), VibeciteError> {
        let content =
            serde_json::to_string_pretty(self).map_err(VibeciteError::SerializeState)?;
        fs::write(Self::file_path(dir), content)?;
        debug!("Saved session with {} vibe(s)", self.vibes.len());
        Ok(())
    }

    /// Delete the session file in `dir` if present.
    pub fn clear(dir: &Path) -> Result<(), VibeciteError> {
        let path = Self::file_path(dir);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Append a new vibe with empty results.
    pub fn add_vibe(&mut self, description: impl Into<String>) {
        self.vibes.push(Vibe::new(description));
    }
}
