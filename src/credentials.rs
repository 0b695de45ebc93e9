//! Where secrets come from
//!
//! The core only ever asks `get_secret(key)` and treats the answer as opaque.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::Password;
use dialoguer::theme::ColorfulTheme;
use tracing::{debug, warn};

use crate::config::Secret;

pub trait CredentialSource {
    /// `None` when the source has nothing (or only whitespace) for `key`
    fn get_secret(&self, key: &str) -> Option<Secret>;
}

/// Whole file content, trimmed; one secret per file
#[derive(Debug, Clone)]
pub struct FileCredentialSource {
    path: PathBuf,
}

impl FileCredentialSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialSource for FileCredentialSource {
    fn get_secret(&self, key: &str) -> Option<Secret> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let secret = Secret::new(contents.trim());
                if secret.is_empty() {
                    warn!(key = %key, path = %self.path.display(), "Secret file is empty");
                    return None;
                }
                debug!(key = %key, path = %self.path.display(), "Read secret from file");
                Some(secret)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(key = %key, path = %self.path.display(), "Secret file not found");
                None
            }
            Err(e) => {
                warn!(key = %key, path = %self.path.display(), error = %e, "Failed to read secret file");
                None
            }
        }
    }
}

/// Hidden interactive prompt; silent when stdin is not a terminal
#[derive(Debug, Clone)]
pub struct PromptCredentialSource {
    label: String,
}

impl PromptCredentialSource {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl CredentialSource for PromptCredentialSource {
    fn get_secret(&self, key: &str) -> Option<Secret> {
        if !io::stdin().is_terminal() {
            debug!(key = %key, "Not a terminal, skipping secret prompt");
            return None;
        }
        match Password::with_theme(&ColorfulTheme::default())
            .with_prompt(&self.label)
            .allow_empty_password(true)
            .interact()
        {
            Ok(value) => Some(Secret::new(value.trim())).filter(|s| !s.is_empty()),
            Err(e) => {
                warn!(key = %key, error = %e, "Secret prompt failed");
                None
            }
        }
    }
}

/// Asks each source in order and returns the first answer
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: Box<dyn CredentialSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl CredentialSource for CredentialChain {
    fn get_secret(&self, key: &str) -> Option<Secret> {
        self.sources.iter().find_map(|source| source.get_secret(key))
    }
}
