use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::{json, Value};

use crate::error::VibeciteError;

const SETTINGS_DIR: &str = ".claude";
const SETTINGS_FILE: &str = "settings.local.json";

/// Tool names the Claude CLI needs for paper discovery.
pub const SEARCH_TOOLS: [&str; 2] = ["WebSearch", "WebFetch"];

/// Path of the Claude settings file inside `dir`.
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Make sure the Claude CLI is allowed to use its web search tools.
///
/// Creates `.claude/settings.local.json` with a default allow list when it
/// does not exist, or appends whichever tool names are missing to an existing
/// one. Idempotent: re-running with the tools already present rewrites
/// nothing and still succeeds.
pub fn ensure_search_tools(dir: &Path) -> Result<(), VibeciteError> {
    let path = settings_path(dir);

    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let settings = json!({
            "permissions": {
                "allow": SEARCH_TOOLS,
                "deny": [],
                "ask": [],
            }
        });
        write_settings(&path, &settings)?;
        info!("Created {:?} with search tools enabled", path);
        return Ok(());
    }

    let content = fs::read_to_string(&path)?;
    let mut settings: Value =
        serde_json::from_str(&content).map_err(VibeciteError::MalformedSettings)?;

    let allow = settings
        .get_mut("permissions")
        .and_then(|p| p.get_mut("allow"))
        .and_then(Value::as_array_mut)
        .ok_or(VibeciteError::SettingsSchema)?;

    let mut changed = false;
    for tool in SEARCH_TOOLS {
        if !allow.iter().any(|v| v.as_str() == Some(tool)) {
            allow.push(Value::String(tool.to_string()));
            changed = true;
        }
    }

    if changed {
        write_settings(&path, &settings)?;
        info!("Added search tools to {:?}", path);
    }

    Ok(())
}

fn write_settings(path: &Path, settings: &Value) -> Result<(), VibeciteError> {
    let content =
        serde_json::to_string_pretty(settings).map_err(VibeciteError::SerializeState)?;
    fs::write(path, content)?;
    Ok(())
}
