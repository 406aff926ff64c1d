use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Days of history kept by pruning
    pub days_to_keep: i64,
    /// Prune old days on startup
    pub auto_prune: bool,
    /// Show done tasks in the list
    pub show_done: bool,
    /// How often the focus overlay re-checks the active task
    pub recheck_interval_secs: u64,
    /// How often to look for tasks starting now
    pub watcher_interval_secs: u64,
    /// Separately synced task file used by `focus` when no --source is given
    pub synced_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            days_to_keep: 7,
            auto_prune: true,
            show_done: true,
            recheck_interval_secs: 5,
            watcher_interval_secs: 60,
            synced_file: None,
        }
    }
}

/// Load settings, falling back to defaults when the file doesn't exist
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))?;
    Ok(settings)
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
