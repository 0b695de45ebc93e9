//! Running-process checks
//!
//! Setup refuses to touch OBS's files while OBS is open: it keeps them
//! loaded and writes its own copy back on exit.

use sysinfo::System;
use tracing::{debug, info};

use crate::error::{BootstrapError, BootstrapResult};

/// Query against the OS process table
pub trait ProcessTable {
    fn query_running(&self, name: &str) -> bool;
}

/// Live process table via sysinfo, refreshed on every query
#[derive(Debug, Default)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn query_running(&self, name: &str) -> bool {
        let mut system = System::new();
        system.refresh_processes();
        let wanted = normalize(name);
        system
            .processes()
            .values()
            .any(|process| normalize(process.name()) == wanted)
    }
}

/// Compare names case-insensitively, ignoring a trailing `.exe`
pub fn normalize(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

pub struct ProcessGate {
    table: Box<dyn ProcessTable>,
}

impl ProcessGate {
    pub fn new(table: Box<dyn ProcessTable>) -> Self {
        Self { table }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemProcessTable))
    }

    pub fn is_running(&self, process_name: &str) -> bool {
        let running = self.table.query_running(process_name);
        debug!(process = %process_name, running, "Checked process table");
        running
    }

    /// Guard for destructive operations
    pub fn ensure_not_running(&self, process_name: &str, display_name: &str) -> BootstrapResult<()> {
        if self.is_running(process_name) {
            info!(process = %process_name, "Refusing to continue while target is running");
            return Err(BootstrapError::precondition(format!(
                "{display_name} ({process_name}) is running; close it first, otherwise it overwrites the new configuration on exit"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Fixed set of "running" process names
    #[derive(Default)]
    pub(crate) struct FakeProcessTable(pub HashSet<String>);

    impl FakeProcessTable {
        pub(crate) fn running(names: &[&str]) -> Self {
            Self(names.iter().map(|n| normalize(n)).collect())
        }
    }

    impl ProcessTable for FakeProcessTable {
        fn query_running(&self, name: &str) -> bool {
            self.0.contains(&normalize(name))
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("OBS64.EXE"), "obs64");
        assert_eq!(normalize(" obs64 "), "obs64");
        assert_eq!(normalize("obs"), "obs");
        assert_eq!(normalize("exe"), "exe");
    }

    #[test]
    fn test_ensure_not_running_blocks() {
        let gate = ProcessGate::new(Box::new(FakeProcessTable::running(&["obs64.exe"])));
        assert!(gate.is_running("obs64"));
        let err = gate.ensure_not_running("obs64", "OBS Studio").unwrap_err();
        match err {
            BootstrapError::Precondition(msg) => {
                assert!(msg.contains("OBS Studio"));
                assert!(msg.contains("obs64"));
            }
            other => panic!("expected precondition error, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_not_running_passes() {
        let gate = ProcessGate::new(Box::new(FakeProcessTable::default()));
        assert!(!gate.is_running("obs64"));
        assert!(gate.ensure_not_running("obs64", "OBS Studio").is_ok());
    }

    #[test]
    fn test_system_table_does_not_find_unknown_process() {
        let gate = ProcessGate::system();
        assert!(!gate.is_running("definitely-not-a-real-process-name-4711"));
    }
}
