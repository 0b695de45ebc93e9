//! The tool's own configuration
//!
//! Stored as JSON under the platform config dir. Every field has a default,
//! so partial files are fine; a missing file is generated on first run for
//! the user to edit. A file that fails to parse is left untouched.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::SetupParams;
use crate::constants::{config, obs};
use crate::process::{ExecutablePath, ProcessDescriptor};

/// A process the start flow brings up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchTarget {
    pub display_name: String,
    /// Name in the process table, used to skip already-running targets
    pub process_name: String,
    /// Install locations, tried in order
    pub candidates: Vec<PathBuf>,
    pub args: Vec<String>,
    pub settle_delay_secs: u64,
    /// Failure to start is a warning rather than an error
    pub optional: bool,
    /// Opened instead when no candidate exists (e.g. `steam://rungameid/...`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_uri: Option<String>,
}

impl Default for LaunchTarget {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            process_name: String::new(),
            candidates: Vec::new(),
            args: Vec::new(),
            settle_delay_secs: 0,
            optional: true,
            fallback_uri: None,
        }
    }
}

impl LaunchTarget {
    pub fn obs_default() -> Self {
        Self {
            display_name: obs::DISPLAY_NAME.to_string(),
            process_name: obs::PROCESS_NAME.to_string(),
            candidates: obs::CANDIDATE_PATHS.iter().map(PathBuf::from).collect(),
            args: Vec::new(),
            settle_delay_secs: obs::SETTLE_DELAY_SECS,
            optional: false,
            fallback_uri: None,
        }
    }

    /// Descriptor with `leading_args` before the configured ones
    pub fn descriptor(&self, leading_args: Vec<String>) -> ProcessDescriptor {
        let executable = match self.candidates.as_slice() {
            [only] => ExecutablePath::Single(only.clone()),
            _ => ExecutablePath::Candidates(self.candidates.clone()),
        };
        ProcessDescriptor::new(self.display_name.clone(), executable)
            .args(leading_args)
            .args(self.args.iter().cloned())
            .settle_secs(self.settle_delay_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub setup: SetupParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_key_file: Option<PathBuf>,
    pub obs: LaunchTarget,
    pub minimize_to_tray: bool,
    /// Started after OBS, in order
    pub companions: Vec<LaunchTarget>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            setup: SetupParams::default(),
            stream_key_file: None,
            obs: LaunchTarget::obs_default(),
            minimize_to_tray: false,
            companions: Vec::new(),
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from `path`, generating a default file if there is none
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Settings::default();
            settings
                .save(path)
                .with_context(|| format!("Failed to save new settings to {}", path.display()))?;
            info!(path = %path.display(), "Generated settings file for user to edit");
            return Ok(settings);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {} (file left unchanged)", path.display()))?;
        info!(path = %path.display(), companions = settings.companions.len(), "Loaded settings");
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }
        let mut contents = serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;
        contents.push('\n');
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file to {}", path.display()))?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|var| env::var(var).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(profile) = get(config::ENV_PROFILE) {
            info!(var = config::ENV_PROFILE, profile = %profile, "Profile name overridden from environment");
            self.setup.profile.name = profile;
        }
        if let Some(collection) = get(config::ENV_COLLECTION) {
            info!(var = config::ENV_COLLECTION, collection = %collection, "Scene collection overridden from environment");
            self.setup.collection.name = collection;
        }
        if let Some(file) = get(config::ENV_STREAM_KEY_FILE) {
            info!(var = config::ENV_STREAM_KEY_FILE, path = %file, "Stream key file overridden from environment");
            self.stream_key_file = Some(PathBuf::from(file));
        }
    }
}
