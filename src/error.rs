//! Error taxonomy shared by every component
//!
//! Validation and conflict errors abort a batch before anything is written.
//! Not-found and launch errors are recoverable: the start flow logs them and
//! moves on to the next independent step.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::config::writer::WriteReport;

pub type BootstrapResult<T> = Result<T, BootstrapError>;

#[derive(thiserror::Error, Debug)]
pub enum BootstrapError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {} already exist(s): {}", paths.len(), display_paths(paths))]
    Conflict { paths: Vec<PathBuf> },

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("{name} not found; tried: {}", display_paths(candidates))]
    NotFound { name: String, candidates: Vec<PathBuf> },

    #[error("failed to launch {name} from {}: {source}", path.display())]
    Launch {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("partial write: {0}")]
    PartialWrite(WriteReport),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Console category an error is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Fatal,
}

impl Severity {
    pub fn exit_code(self) -> i32 {
        match self {
            Severity::Info | Severity::Warning => 0,
            Severity::Fatal => 1,
        }
    }
}

impl BootstrapError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            BootstrapError::NotFound { .. } | BootstrapError::Launch { .. } => Severity::Warning,
            _ => Severity::Fatal,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> DisplayPaths<'_> {
    DisplayPaths(paths)
}

struct DisplayPaths<'a>(&'a [PathBuf]);

impl fmt::Display for DisplayPaths<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_are_stable() {
        assert!(
            BootstrapError::validation("x")
                .to_string()
                .starts_with("validation error:")
        );
        assert!(
            BootstrapError::precondition("x")
                .to_string()
                .starts_with("precondition failed:")
        );
    }

    #[test]
    fn test_not_found_lists_every_candidate() {
        let err = BootstrapError::NotFound {
            name: "OBS".to_string(),
            candidates: vec![PathBuf::from("/a/obs"), PathBuf::from("/b/obs")],
        };
        let msg = err.to_string();
        assert!(msg.contains("/a/obs"));
        assert!(msg.contains("/b/obs"));
    }

    #[test]
    fn test_not_found_with_no_candidates() {
        let err = BootstrapError::NotFound {
            name: "OBS".to_string(),
            candidates: Vec::new(),
        };
        assert!(err.to_string().contains("(none)"));
    }

    #[test]
    fn test_severity_mapping() {
        let launch = BootstrapError::Launch {
            name: "OBS".to_string(),
            path: PathBuf::from("/x"),
            source: io::Error::other("denied"),
        };
        assert_eq!(launch.severity(), Severity::Warning);
        assert_eq!(launch.severity().exit_code(), 0);

        let conflict = BootstrapError::Conflict {
            paths: vec![PathBuf::from("basic.ini")],
        };
        assert_eq!(conflict.severity(), Severity::Fatal);
        assert_eq!(conflict.severity().exit_code(), 1);
        assert_eq!(Severity::Warning.exit_code(), 0);
    }

    #[test]
    fn test_other_preserves_source() {
        let err = BootstrapError::Other(anyhow::Error::new(io::Error::other("boom")));
        assert!(err.to_string().contains("boom"));
    }
}
