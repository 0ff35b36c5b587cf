use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the vibecite library modules.
#[derive(Error, Debug)]
pub enum VibeciteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file {path:?} contains invalid JSON: {source}")]
    MalformedSession {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize state to JSON: {0}")]
    SerializeState(#[source] serde_json::Error),

    #[error("Claude settings file contains invalid JSON: {0}")]
    MalformedSettings(#[source] serde_json::Error),

    #[error("Claude settings file has no permissions.allow list")]
    SettingsSchema,
}
