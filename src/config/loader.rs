//! Preferences file location and load/save
//!
//! The preferences file lives at `~/.zendesk-palette/preferences.json`
//! unless `ZENDESK_PALETTE_CONFIG` points elsewhere (tilde-expanded).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, ZendeskError};

use super::defaults::{PREFERENCES_PATH_ENV, PREFERENCES_RELATIVE_PATH};
use super::types::Preferences;

/// Resolve the preferences file path.
pub fn preferences_path() -> PathBuf {
    if let Ok(overridden) = std::env::var(PREFERENCES_PATH_ENV) {
        return PathBuf::from(shellexpand::tilde(&overridden).as_ref());
    }
    dirs::home_dir()
        .map(|h| h.join(PREFERENCES_RELATIVE_PATH))
        .unwrap_or_else(|| std::env::temp_dir().join(PREFERENCES_RELATIVE_PATH))
}

/// Load preferences from a JSON file.
///
/// A missing file is not an error: the palette starts unconfigured and shows
/// onboarding. A malformed file is surfaced as a `Config` error so the host
/// can tell the user which file to fix.
pub fn load_preferences(path: &Path) -> Result<Preferences> {
    if !path.exists() {
        info!(path = %path.display(), "Preferences file not found, using defaults");
        return Ok(Preferences::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ZendeskError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let prefs: Preferences = serde_json::from_str(&content)
        .map_err(|e| ZendeskError::Config(format!("cannot parse {}: {}", path.display(), e)))?;

    for instance in &prefs.instances {
        if let Err(e) = instance.validate() {
            warn!(
                subdomain = %instance.subdomain,
                error = %e,
                "Skipping validation failure in preferences (instance kept, searches against it will fail)"
            );
        }
    }

    info!(
        path = %path.display(),
        instances = prefs.instances.len(),
        "Loaded preferences"
    );
    Ok(prefs)
}

/// Save preferences to a JSON file, creating parent directories if needed.
pub fn save_preferences(prefs: &Preferences, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ZendeskError::Config(format!("cannot create {}: {}", parent.display(), e)))?;
    }

    let content = serde_json::to_string_pretty(prefs)?;
    fs::write(path, content)
        .map_err(|e| ZendeskError::Config(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(())
}
