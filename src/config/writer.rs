//! Materializes rendered files under the OBS settings root
//!
//! Conflicts are resolved for the whole batch before the first byte is
//! written. Individual write failures after that point are reported, not
//! rolled back.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::render::RenderedFile;
use crate::error::{BootstrapError, BootstrapResult};

/// What to do when a target file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Force,
    PromptOnConflict,
    FailOnConflict,
}

/// Asks the operator a yes/no question
pub trait Confirmation {
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedWrite {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch; paths are absolute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    /// Already present with identical content
    pub unchanged: Vec<PathBuf>,
    pub failed: Vec<FailedWrite>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for WriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} unchanged, {} failed",
            self.written.len(),
            self.unchanged.len(),
            self.failed.len()
        )?;
        for failure in &self.failed {
            write!(f, "; {}: {}", failure.path.display(), failure.reason)?;
        }
        Ok(())
    }
}

/// A target as it would be written, for dry runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub path: PathBuf,
    pub bytes: usize,
    pub exists: bool,
}

pub struct ConfigWriter {
    root: PathBuf,
    confirmation: Box<dyn Confirmation>,
}

impl ConfigWriter {
    pub fn new(root: impl Into<PathBuf>, confirmation: Box<dyn Confirmation>) -> Self {
        Self {
            root: root.into(),
            confirmation,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute target for a rendered path; refuses paths escaping the root
    pub fn target(&self, relative: &Path) -> BootstrapResult<PathBuf> {
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(BootstrapError::validation(format!(
                "rendered path '{}' must be relative and stay inside the settings root",
                relative.display()
            )));
        }
        Ok(self.root.join(relative))
    }

    pub fn plan(&self, files: &[RenderedFile]) -> BootstrapResult<Vec<PlannedWrite>> {
        files
            .iter()
            .map(|file| {
                let path = self.target(&file.path)?;
                Ok(PlannedWrite {
                    exists: path.exists(),
                    bytes: file.content.len(),
                    path,
                })
            })
            .collect()
    }

    /// Write every file, creating parent directories as needed
    ///
    /// Files are written as UTF-8 exactly as rendered.
    pub fn materialize(&self, files: &[RenderedFile], policy: ConflictPolicy) -> BootstrapResult<WriteReport> {
        let targets = files
            .iter()
            .map(|file| self.target(&file.path))
            .collect::<BootstrapResult<Vec<_>>>()?;

        let conflicts: Vec<PathBuf> = targets.iter().filter(|p| p.exists()).cloned().collect();
        if !conflicts.is_empty() {
            self.resolve_conflicts(conflicts, policy)?;
        }

        let mut report = WriteReport::default();
        for (file, path) in files.iter().zip(targets) {
            match write_file(&path, &file.content) {
                Ok(true) => {
                    debug!(path = %path.display(), bytes = file.content.len(), "Wrote file");
                    report.written.push(path);
                }
                Ok(false) => {
                    debug!(path = %path.display(), "File already up to date");
                    report.unchanged.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to write file");
                    report.failed.push(FailedWrite {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            root = %self.root.display(),
            written = report.written.len(),
            unchanged = report.unchanged.len(),
            failed = report.failed.len(),
            "Materialized config batch"
        );

        if report.is_complete() {
            Ok(report)
        } else {
            Err(BootstrapError::PartialWrite(report))
        }
    }

    fn resolve_conflicts(&self, conflicts: Vec<PathBuf>, policy: ConflictPolicy) -> BootstrapResult<()> {
        match policy {
            ConflictPolicy::Force => {
                info!(count = conflicts.len(), "Overwriting existing files");
                Ok(())
            }
            ConflictPolicy::FailOnConflict => Err(BootstrapError::Conflict { paths: conflicts }),
            ConflictPolicy::PromptOnConflict => {
                let listing: Vec<String> = conflicts
                    .iter()
                    .map(|p| format!("  {}", p.display()))
                    .collect();
                let message = format!(
                    "These files already exist and will be overwritten:\n{}\nContinue?",
                    listing.join("\n")
                );
                if self.confirmation.confirm(&message) {
                    info!(count = conflicts.len(), "Overwrite confirmed");
                    Ok(())
                } else {
                    info!("Overwrite declined, nothing written");
                    Err(BootstrapError::Conflict { paths: conflicts })
                }
            }
        }
    }
}

/// Returns false when the file already holds exactly this content
fn write_file(path: &Path, content: &str) -> std::io::Result<bool> {
    if let Ok(existing) = fs::read(path)
        && existing == content.as_bytes()
    {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(true)
}
